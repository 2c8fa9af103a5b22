mod config;
mod overlay;
mod panel;
mod state;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use config::{AppConfig, WindowConfig};
use egui::Context as EguiContext;
use glam::Vec2;
use gridview_driver::{
    AnimationDriver, DriverError, FrameScheduler, FrameTarget, SystemClock,
};
use gridview_input::{Action, Button, InputMapper, Key};
use gridview_render_wgpu::{RenderError, WgpuRenderer, acquire_frame};
use gridview_tools::{FrameStats, StatsPanel};
use overlay::StatsView;
use state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "gridview-desktop", about = "Grid viewer with a hoverable cube")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Hover easing rate per second
    #[arg(long)]
    rate: Option<f32>,

    /// Offset a hovered object rises by
    #[arg(long)]
    raised_offset: Option<f32>,

    /// Stats panel shown at startup
    #[arg(long, value_enum)]
    stats_panel: Option<PanelArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PanelArg {
    Fps,
    Ms,
    Mb,
}

impl From<PanelArg> for StatsPanel {
    fn from(arg: PanelArg) -> Self {
        match arg {
            PanelArg::Fps => StatsPanel::Fps,
            PanelArg::Ms => StatsPanel::Ms,
            PanelArg::Mb => StatsPanel::Mb,
        }
    }
}

impl Cli {
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(rate) = self.rate {
            config.hover.rate = rate;
        }
        if let Some(offset) = self.raised_offset {
            config.hover.raised_offset = offset;
        }
        if let Some(panel) = self.stats_panel {
            config.stats_panel = panel.into();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Schedules frames by asking the window for a redraw.
#[derive(Default)]
struct WindowScheduler {
    window: Option<Arc<Window>>,
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Window, surface and the two renderers drawing into it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_ctx: EguiContext,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, window_config: &WindowConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gridview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_ctx = EguiContext::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_ctx,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn render(&mut self, state: &mut AppState, stats: &StatsView) -> Result<(), RenderError> {
        self.renderer.sync_grid(&self.device, &state.grid);

        let Some(output) = acquire_frame(&self.surface, &self.device, &self.config)? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            &state.scene,
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx, stats);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        Ok(())
    }
}

/// One frame's view of the app, handed to the animation driver.
struct ViewerFrame<'a> {
    state: &'a mut AppState,
    gpu: &'a mut Gpu,
    stats: &'a StatsView,
}

impl FrameTarget for ViewerFrame<'_> {
    type Error = RenderError;

    fn update(&mut self, delta: f32) {
        self.state.update(delta);
    }

    fn render(&mut self) -> Result<(), RenderError> {
        self.gpu.render(self.state, self.stats)
    }
}

struct GpuApp {
    config: AppConfig,
    state: AppState,
    gpu: Option<Gpu>,
    driver: AnimationDriver<WindowScheduler, SystemClock>,
    stats: FrameStats,
    mapper: InputMapper,
}

impl GpuApp {
    fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(&config),
            gpu: None,
            driver: AnimationDriver::new(
                WindowScheduler::default(),
                SystemClock::new(),
                config.driver_config(),
            ),
            stats: FrameStats::new(config.stats_panel),
            mapper: InputMapper::default(),
            config,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.stop();
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let view = StatsView::capture(&self.stats);
        let mut target = ViewerFrame {
            state: &mut self.state,
            gpu,
            stats: &view,
        };
        if let Err(DriverError::Render { frame, source }) =
            self.driver.step(&mut target, &mut self.stats)
        {
            tracing::error!(frame, "render failed: {source}");
            event_loop.exit();
            return;
        }
        if self.state.take_stats_cycle() {
            self.stats.cycle_panel();
        }
    }
}

fn map_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Middle => Button::Middle,
        _ => Button::Other,
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.config.window) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.handle_action(Action::Resized {
                    width: size.width,
                    height: size.height,
                });
                self.driver.scheduler_mut().window = Some(gpu.window.clone());
                self.gpu = Some(gpu);
                self.driver.start();
            }
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        let actions = match event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
                return;
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                return;
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
                vec![self.mapper.resized(size.width, size.height)]
            }
            WindowEvent::CursorMoved { position, .. } => self
                .mapper
                .pointer_moved(Vec2::new(position.x as f32, position.y as f32)),
            WindowEvent::CursorLeft { .. } => {
                self.mapper.pointer_left();
                Vec::new()
            }
            WindowEvent::MouseInput { button, state, .. } => {
                vec![self
                    .mapper
                    .button(map_button(button), state == ElementState::Pressed)]
            }
            WindowEvent::MouseWheel { delta, .. } => vec![match delta {
                MouseScrollDelta::LineDelta(_, y) => self.mapper.wheel_lines(y),
                MouseScrollDelta::PixelDelta(p) => self.mapper.wheel_pixels(p.y as f32),
            }],
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => vec![self.mapper.key(map_key(code), state == ElementState::Pressed)],
            _ => return,
        };

        for action in actions {
            if !self.state.handle_action(action) {
                self.shutdown(event_loop);
                return;
            }
        }
        self.state.refresh_hover();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.app_config()?;
    tracing::info!("gridview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
