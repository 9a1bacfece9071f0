// ============================================================================
// app.rs — bouncelab
// Application state and winit event-loop handler with egui UI integration.
// Frame sequence: input → population sync → physics → draw → UI → present →
// pace-wait, all on the main thread.
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes},
};

use crate::config::{SimulationParams, MIN_BALL_COUNT, TARGET_FPS};
use crate::diagnostics::SimDiagnostics;
use crate::pacer::FramePacer;
use crate::renderer::BallRenderer;
use crate::ui::{self, UiState};
use crate::world::World;

// ======================== Application ========================

pub struct App {
    state: Option<AppState>,
    config: AppConfig,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub ball_count: usize,
    pub gravity_enabled: bool,
    pub seed: Option<u64>,
    pub diag_interval: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ball_count: MIN_BALL_COUNT,
            gravity_enabled: true,
            seed: None,
            diag_interval: 300,
        }
    }
}

struct AppState {
    // GPU
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,

    // Simulation
    world: World,
    sim_params: SimulationParams,

    // Rendering
    renderer: BallRenderer,
    window: Arc<Window>,

    // egui
    egui_ctx: egui::Context,
    egui_winit_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui: UiState,

    // Timing
    pacer: FramePacer,
    last_redraw: Instant,
    fps: f32,
    diag_interval: u64,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: None,
            config,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title("bouncelab")
            .with_inner_size(winit::dpi::LogicalSize::new(1024u32, 1024u32));

        let window = Arc::new(event_loop.create_window(window_attrs).unwrap());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let (device, queue, surface_config) =
            pollster::block_on(init_gpu(&instance, &surface, &window));

        surface.configure(&device, &surface_config);

        let renderer = BallRenderer::new(&device, surface_config.format);

        let mut world = World::new(self.config.seed);
        let sim_params = SimulationParams {
            gravity_enabled: self.config.gravity_enabled,
            target_ball_count: self.config.ball_count.max(MIN_BALL_COUNT),
            ..SimulationParams::default()
        };
        world.sync_population(sim_params.target_ball_count);

        // ---- Initialize egui ----
        let egui_ctx = egui::Context::default();
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(27, 27, 35, 235);
        visuals.panel_fill = egui::Color32::from_rgba_premultiplied(20, 20, 28, 230);
        egui_ctx.set_visuals(visuals);

        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            event_loop,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_config.format, None, 1, false);

        log::info!(
            "bouncelab initialized: {} balls, gravity {} (seed: {:?})",
            sim_params.target_ball_count,
            if sim_params.gravity_enabled { "ON" } else { "OFF" },
            self.config.seed,
        );

        self.state = Some(AppState {
            device,
            queue,
            surface,
            surface_config,
            world,
            sim_params,
            renderer,
            window: window.clone(),
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            ui: UiState::default(),
            pacer: FramePacer::new(TARGET_FPS),
            last_redraw: Instant::now(),
            fps: 0.0,
            diag_interval: self.config.diag_interval.max(1),
        });

        // Initial redraw — required on macOS with winit 0.30
        window.request_redraw();
    }

    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Pass events to egui first
        let egui_response = state.egui_winit_state.on_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                handle_keyboard(state, event_loop, &event, egui_response.consumed);
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    state.surface_config.width = new_size.width;
                    state.surface_config.height = new_size.height;
                    state.surface.configure(&state.device, &state.surface_config);
                }
            }

            WindowEvent::RedrawRequested => {
                redraw(state);
            }

            _ => {}
        }
    }
}

// ======================== GPU Initialization ========================

async fn init_gpu(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    window: &Window,
) -> (wgpu::Device, wgpu::Queue, wgpu::SurfaceConfiguration) {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .expect(
            "Failed to find a suitable GPU adapter.\n\
             bouncelab requires a GPU with Vulkan, Metal, or DX12 support.",
        );

    log::info!("GPU: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("bouncelab_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .expect("Failed to create device");

    let size = window.inner_size();
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .copied()
        .unwrap_or(surface_caps.formats[0]);

    // The pacer owns frame timing, so prefer an uncapped present mode and
    // fall back to Fifo where the platform offers nothing else.
    let present_mode = if surface_caps.present_modes.contains(&wgpu::PresentMode::Mailbox) {
        log::info!("Present mode: Mailbox");
        wgpu::PresentMode::Mailbox
    } else if surface_caps.present_modes.contains(&wgpu::PresentMode::Immediate) {
        log::info!("Present mode: Immediate");
        wgpu::PresentMode::Immediate
    } else {
        log::info!("Present mode: Fifo (VSync ON)");
        wgpu::PresentMode::Fifo
    };

    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode: surface_caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };

    (device, queue, surface_config)
}

// ======================== Keyboard Handling ========================

fn handle_keyboard(
    state: &mut AppState,
    event_loop: &winit::event_loop::ActiveEventLoop,
    event: &winit::event::KeyEvent,
    egui_consumed: bool,
) {
    let pressed = event.state.is_pressed();

    // Global hotkeys — always handled, even when egui has focus
    match &event.logical_key {
        Key::Named(NamedKey::Escape) if pressed => event_loop.exit(),
        Key::Named(NamedKey::F1) if pressed => {
            state.ui.show_panel = !state.ui.show_panel;
        }
        Key::Named(NamedKey::F9) if pressed => {
            state.ui.show_analysis = !state.ui.show_analysis;
        }
        _ => {}
    }

    // Simulation controls — only if egui didn't consume the event
    if egui_consumed {
        return;
    }

    match &event.logical_key {
        Key::Named(NamedKey::Space) if pressed => {
            state.sim_params.paused = !state.sim_params.paused;
            log::info!("{}", if state.sim_params.paused { "Paused" } else { "Resumed" });
        }

        Key::Character(c) => match c.as_str() {
            "g" | "G" if pressed => {
                state.sim_params.gravity_enabled = !state.sim_params.gravity_enabled;
                log::info!(
                    "Gravity: {}",
                    if state.sim_params.gravity_enabled { "ON" } else { "OFF" }
                );
            }
            "r" | "R" if pressed => {
                state.ui.respawn_requested = true;
            }
            _ => {}
        },

        Key::Named(named) => match named {
            NamedKey::ArrowUp if pressed => {
                state.sim_params.target_ball_count += 1;
            }
            NamedKey::ArrowDown if pressed => {
                state.sim_params.target_ball_count = state
                    .sim_params
                    .target_ball_count
                    .saturating_sub(1)
                    .max(MIN_BALL_COUNT);
            }
            _ => {}
        },

        _ => {}
    }
}

// ======================== Frame Rendering ========================

fn redraw(state: &mut AppState) {
    state.pacer.begin_frame();

    // FPS (exponential moving average over measured frame boundaries)
    let now = Instant::now();
    let dt = now.duration_since(state.last_redraw).as_secs_f32().max(0.0001);
    state.last_redraw = now;
    state.fps = state.fps * 0.95 + (1.0 / dt) * 0.05;

    // ---- Pending UI actions from the previous frame ----
    if state.ui.respawn_requested {
        state.world.respawn(state.sim_params.target_ball_count);
        state.ui.history.clear();
        state.ui.respawn_requested = false;
        log::info!("Ensemble respawned ({} balls)", state.world.len());
    }

    // ---- Population sync ----
    state.world.sync_population(state.sim_params.target_ball_count);

    // ---- Physics tick ----
    if !state.sim_params.paused {
        state.world.step(&state.sim_params.physics());
    } else if state.ui.step_requested {
        state.world.step(&state.sim_params.physics());
        state.ui.step_requested = false;
        log::info!("Single step");
    }

    // ---- Diagnostics ----
    let diag = SimDiagnostics::from_world(&state.world);
    state.ui.history.record(&diag, state.world.frame, state.fps);
    if !state.sim_params.paused
        && state.world.frame > 0
        && state.world.frame % state.diag_interval == 0
    {
        diag.log(state.world.frame);
    }

    // ---- egui frame ----
    let fps = state.fps;
    let frame = state.world.frame;
    let live_count = state.world.len();
    let raw_input = state.egui_winit_state.take_egui_input(&state.window);
    let full_output = state.egui_ctx.run(raw_input, |ctx| {
        ui::render_ui(ctx, &mut state.sim_params, &mut state.ui, fps, frame, live_count);
    });
    state
        .egui_winit_state
        .handle_platform_output(&state.window, full_output.platform_output);

    // ---- Instance upload ----
    let win_w = state.surface_config.width;
    let win_h = state.surface_config.height;
    state
        .renderer
        .prepare(&state.device, &state.queue, &state.world, win_w, win_h);

    // ---- Ball render pass ----
    let output = match state.surface.get_current_texture() {
        Ok(t) => t,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            state.surface.configure(&state.device, &state.surface_config);
            return;
        }
        Err(e) => {
            log::error!("Surface error: {:?}", e);
            return;
        }
    };

    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = state
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("balls_encoder"),
        });

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("balls_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.025,
                        g: 0.025,
                        b: 0.025,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        state.renderer.render(&mut pass);
    }

    state.queue.submit(std::iter::once(encoder.finish()));

    // ---- egui render pass (on top, separate encoder) ----
    let paint_jobs = state
        .egui_ctx
        .tessellate(full_output.shapes, full_output.pixels_per_point);

    for (id, image_delta) in &full_output.textures_delta.set {
        state
            .egui_renderer
            .update_texture(&state.device, &state.queue, *id, image_delta);
    }

    let screen_descriptor = egui_wgpu::ScreenDescriptor {
        size_in_pixels: [win_w, win_h],
        pixels_per_point: full_output.pixels_per_point,
    };

    let mut egui_encoder = state
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });

    state.egui_renderer.update_buffers(
        &state.device,
        &state.queue,
        &mut egui_encoder,
        &paint_jobs,
        &screen_descriptor,
    );

    render_egui_pass(
        &state.egui_renderer,
        &mut egui_encoder,
        &view,
        &paint_jobs,
        &screen_descriptor,
    );

    state.queue.submit(std::iter::once(egui_encoder.finish()));

    output.present();

    for id in &full_output.textures_delta.free {
        state.egui_renderer.free_texture(id);
    }

    // ---- Pace-wait: spin out the rest of the 1000/30 ms budget ----
    state.pacer.end_frame();

    state.window.request_redraw();
}

// ======================== egui Render Helper ========================

/// Render egui paint jobs into a render pass.
/// Extracted as a free function to decouple the egui::Renderer lifetime
/// from the AppState borrow, allowing the render pass encoder to be local.
fn render_egui_pass(
    renderer: &egui_wgpu::Renderer,
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    paint_jobs: &[egui::ClippedPrimitive],
    screen_descriptor: &egui_wgpu::ScreenDescriptor,
) {
    let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("egui_render_pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    // forget_lifetime converts RenderPass<'encoder> → RenderPass<'static>
    // which is required by egui_wgpu::Renderer::render in wgpu 24.
    let mut pass = pass.forget_lifetime();
    renderer.render(&mut pass, paint_jobs, screen_descriptor);
}
