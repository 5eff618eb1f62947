//! Application event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`]. On `resumed` it creates the
//! window and the GPU [`Context`], then starts fetching the scene images in
//! the background (a tokio task natively, `spawn_local` on the web). The
//! images come back through the event loop proxy as
//! [`FlowEvent::AssetsLoaded`], at which point the scene is built.
//!
//! # Lifecycle
//!
//! Every redraw:
//! 1. advance the shared clock
//! 2. apply pending orbit input and upload the camera
//! 3. draw the scene, opaque meshes first, then blended ones back to front
//! 4. present and request the next redraw

use std::{iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::AppConfig,
    context::Context,
    render,
    resources::{SceneImages, load_scene_images},
    scene::PotionTable,
};

/// Window, GPU context and the scene once its images are in.
pub(crate) struct AppState {
    pub(crate) ctx: Context,
    scene: Option<PotionTable>,
    is_surface_configured: bool,
    started: Instant,
}

impl AppState {
    async fn new(window: Arc<Window>, settings: &AppConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, settings).await?;
        Ok(Self {
            ctx,
            scene: None,
            is_surface_configured: false,
            started: Instant::now(),
        })
    }

    /// Zero sizes (minimised windows) are ignored.
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx.camera.controller.resize(height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.resize_targets();
        }
    }

    fn populate(&mut self, images: &SceneImages) {
        self.scene = Some(PotionTable::new(&self.ctx, images));
    }

    fn update(&mut self) {
        let ctx = &mut self.ctx;
        ctx.time
            .update(&ctx.queue, self.started.elapsed(), ctx.time_scale);
        ctx.camera.update(&ctx.queue, &ctx.projection);
    }

    fn render(&mut self) -> Result<(), wgpu::CurrentSurfaceTexture> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.update();

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture)
            | wgpu::CurrentSurfaceTexture::Suboptimal(texture) => texture,
            other => return Err(other),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        let scene = self
            .scene
            .as_ref()
            .map_or(render::Render::None, PotionTable::on_render);
        render::record(
            &mut encoder,
            &self.ctx.msaa_texture.view,
            &view,
            &self.ctx.depth_texture.view,
            self.ctx.clear_colour,
            &self.ctx.pipelines,
            &self.ctx.camera,
            scene,
        );

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub(crate) enum FlowEvent {
    /// The GPU context finished initializing in `spawn_local`.
    #[cfg(target_arch = "wasm32")]
    Initialized(Box<AppState>),
    AssetsLoaded(SceneImages),
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    settings: AppConfig,
    state: Option<AppState>,
    // images that arrived before the context was ready
    pending_images: Option<SceneImages>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, settings: AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            settings,
            state: None,
            pending_images: None,
        })
    }

    fn spawn_asset_loading(&self) {
        let proxy = self.proxy.clone();
        let assets = self.settings.assets.clone();
        let task = async move {
            let images = load_scene_images(&assets).await;
            if proxy.send_event(FlowEvent::AssetsLoaded(images)).is_err() {
                log::warn!("event loop closed before the images arrived");
            }
        };
        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.spawn(task);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task);
    }

    fn window_attributes(&self) -> winit::window::WindowAttributes {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes()
            .with_title(self.settings.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.settings.window.width,
                self.settings.window.height,
            ));

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes = window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => log::warn!("no #{} element, letting winit create a canvas", CANVAS_ID),
            }
        }
        window_attributes
    }

    fn install(&mut self, mut state: AppState) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        if let Some(images) = self.pending_images.take() {
            state.populate(&images);
        }
        state.ctx.window.request_redraw();
        self.state = Some(state);
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = match event_loop.create_window(self.window_attributes()) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create the window: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.spawn_asset_loading();

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self
                .async_runtime
                .block_on(AppState::new(window, &self.settings))
            {
                Ok(state) => self.install(state),
                Err(e) => {
                    log::error!("App initialization failed: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let settings = self.settings.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match AppState::new(window, &settings).await {
                    Ok(state) => {
                        if proxy.send_event(FlowEvent::Initialized(Box::new(state))).is_err() {
                            log::error!("event loop closed during initialization");
                        }
                    }
                    Err(e) => log::error!("App initialization failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            FlowEvent::Initialized(state) => self.install(*state),
            FlowEvent::AssetsLoaded(images) => match &mut self.state {
                Some(state) => state.populate(&images),
                None => self.pending_images = Some(images),
            },
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => match state.render() {
                Ok(()) => (),
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(e) => log::error!("Unable to render {:?}", e),
            },
            _ => {}
        }
    }
}

fn init_logger(level: &str) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        // RUST_LOG still wins over the configured level
        let env = env_logger::Env::default().default_filter_or(level);
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        let level = level.parse().unwrap_or(log::Level::Info);
        // fails only when a logger is already installed
        let _ = console_log::init_with_level(level);
    }
}

/// Open the window and render the potion table until it is closed.
pub fn run(settings: AppConfig) -> anyhow::Result<()> {
    init_logger(&settings.debug.log_level);

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, settings)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
