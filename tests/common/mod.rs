#![allow(dead_code)]

use std::time::Duration;

use potion_table::{
    camera::{Camera, CameraController, CameraResources, Projection},
    data_structures::texture::Texture,
    pipelines::{Pipelines, SAMPLE_COUNT, time::TimeResources},
    render::{self, Render},
};

pub(crate) const SIZE: u32 = 256;
pub(crate) const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Device, pipelines and camera for rendering without a window.
pub(crate) struct Headless {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub pipelines: Pipelines,
    pub time: TimeResources,
    pub camera: CameraResources,
}

impl Headless {
    pub async fn new(eye: [f32; 3], target: [f32; 3]) -> Option<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        // No adapter on this machine: the caller skips the test
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .ok()?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("headless device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .ok()?;

        let projection = Projection::new(SIZE, SIZE, cgmath::Deg(60.0), 1.0, 1000.0);
        let camera = CameraResources::new(
            &device,
            Camera::new(eye, target),
            CameraController::new(1.0, 1.0, 1.0),
            &projection,
        );
        let time = TimeResources::new(&device);
        let pipelines = Pipelines::new(
            &device,
            FORMAT,
            &camera.bind_group_layout,
            &time.bind_group_layout,
        );
        Some(Self {
            device,
            queue,
            pipelines,
            time,
            camera,
        })
    }

    /// Render one frame into an offscreen target and read it back.
    pub async fn render_to_image(
        &self,
        clear_colour: wgpu::Color,
        render: Render<'_>,
    ) -> image::RgbaImage {
        let extent = wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        };
        let target = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let msaa = Texture::create_msaa_target(
            &self.device,
            [SIZE, SIZE],
            FORMAT,
            SAMPLE_COUNT,
            "offscreen msaa",
        );
        let depth = Texture::create_depth_texture(
            &self.device,
            [SIZE, SIZE],
            SAMPLE_COUNT,
            "offscreen depth",
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("offscreen encoder"),
            });
        render::record(
            &mut encoder,
            &msaa.view,
            &view,
            &depth.view,
            clear_colour,
            &self.pipelines,
            &self.camera,
            render,
        );

        // 256 * 4 bytes per row already satisfies COPY_BYTES_PER_ROW_ALIGNMENT
        let u32_size = std::mem::size_of::<u32>() as u32;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback"),
            size: (u32_size * SIZE * SIZE) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(u32_size * SIZE),
                    rows_per_image: Some(SIZE),
                },
            },
            extent,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .unwrap();
        rx.receive().await.unwrap().unwrap();

        let data = buffer_slice.get_mapped_range().to_vec();
        output_buffer.unmap();
        image::RgbaImage::from_raw(SIZE, SIZE, data).unwrap()
    }
}
