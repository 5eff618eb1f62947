use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraController, CameraResources, Projection},
    config::AppConfig,
    data_structures::texture,
    pipelines::{Pipelines, SAMPLE_COUNT, time::TimeResources},
};

/// Everything GPU-side that outlives a single frame.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub(crate) msaa_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub time: TimeResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub time_scale: f32,
}

impl Context {
    pub async fn new(window: Arc<Window>, settings: &AppConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting the GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours and textures are linear inside the shaders, the sRGB
        // surface encodes them on write.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera_settings = &settings.camera;
        let projection = Projection::new(
            config.width,
            config.height,
            cgmath::Deg(camera_settings.fov),
            camera_settings.near,
            camera_settings.far,
        );
        let mut controller = CameraController::new(
            camera_settings.rotate_speed,
            camera_settings.zoom_speed,
            camera_settings.pan_speed,
        )
        .with_distance_limits(
            camera_settings.min_distance,
            camera_settings.max_distance.unwrap_or(f32::INFINITY),
        );
        controller.resize(config.height);
        let camera = CameraResources::new(
            &device,
            Camera::new(camera_settings.eye, camera_settings.target),
            controller,
            &projection,
        );

        let time = TimeResources::new(&device);
        let pipelines = Pipelines::new(
            &device,
            config.format,
            &camera.bind_group_layout,
            &time.bind_group_layout,
        );

        let (depth_texture, msaa_texture) = frame_targets(&device, &config);

        Ok(Self {
            window,
            depth_texture,
            msaa_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            time,
            pipelines,
            clear_colour: settings.rendering.clear_colour(),
            time_scale: settings.rendering.time_scale,
        })
    }
}

impl Context {
    /// Recreate the depth buffer and the multisampled target after the
    /// surface configuration changed.
    pub(crate) fn resize_targets(&mut self) {
        let (depth_texture, msaa_texture) = frame_targets(&self.device, &self.config);
        self.depth_texture = depth_texture;
        self.msaa_texture = msaa_texture;
    }
}

fn frame_targets(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> (texture::Texture, texture::Texture) {
    let size = [config.width, config.height];
    (
        texture::Texture::create_depth_texture(device, size, SAMPLE_COUNT, "depth_texture"),
        texture::Texture::create_msaa_target(device, size, config.format, SAMPLE_COUNT, "msaa_texture"),
    )
}
