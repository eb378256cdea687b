use std::sync::Arc;

use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::TextureSet;
use crate::config::{self, Args};
use crate::debug::timer::FramePhase;
use crate::debug::DebugOverlay;
use crate::error::InitError;
use crate::input::{self, Action};
use crate::render::transform;
use crate::render::GpuState;
use crate::scene::Driver;

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    args: Args,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    overlay: Option<DebugOverlay>,

    // Animation
    driver: Driver,

    // Frame timing
    last_frame_time: Option<Instant>,
    frame_count: u64,

    // Set when start-up fails; returned from `run` after the loop exits.
    init_error: Option<InitError>,
}

impl App {
    fn new(args: Args) -> Self {
        let driver = Driver::new(args.variant);
        Self {
            args,
            window: None,
            gpu: None,
            overlay: None,
            driver,
            last_frame_time: None,
            frame_count: 0,
            init_error: None,
        }
    }

    /// Create the window, GPU state and textures. The window stays hidden
    /// unless everything succeeds.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), InitError> {
        let (w, h) = config::WINDOW_SIZE;
        let (x, y) = config::WINDOW_POS;
        let attrs = WindowAttributes::default()
            .with_title(config::WINDOW_TITLE)
            .with_visible(false)
            .with_inner_size(winit::dpi::PhysicalSize::new(w, h))
            .with_position(winit::dpi::PhysicalPosition::new(x, y));

        let window = Arc::new(event_loop.create_window(attrs)?);

        let (base_manifest, effect_manifest) = self.driver.manifests();
        let base = TextureSet::load(&self.args.assets, base_manifest);
        let effect = effect_manifest.map(|m| TextureSet::load(&self.args.assets, m));
        let missing = base.missing() + effect.as_ref().map_or(0, TextureSet::missing);
        log::info!(
            "Loaded {} textures from {}: {} missing",
            base.len() + effect.as_ref().map_or(0, TextureSet::len),
            self.args.assets.display(),
            missing
        );

        let gpu = GpuState::new(window.clone(), &base, effect.as_ref())?;
        log::info!("wgpu + sprite pipeline initialized");

        let overlay =
            DebugOverlay::new(&window, &gpu, self.driver.variant(), self.args.debug_overlay);

        self.gpu = Some(gpu);
        self.overlay = Some(overlay);

        // Redraw every loop iteration
        event_loop.set_control_flow(ControlFlow::Poll);

        window.set_visible(true);
        log::info!(
            "{} variant running in {}x{} window",
            self.driver.variant().label(),
            w,
            h
        );

        self.window = Some(window);
        Ok(())
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: Action) {
        match action {
            Action::Quit => {
                log::info!("ESC pressed, exiting");
                event_loop.exit();
            }
            Action::ToggleOverlay => {
                if let Some(overlay) = &mut self.overlay {
                    overlay.toggle();
                }
            }
            Action::Play(_) => {
                self.driver.handle(action);
            }
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(gpu), Some(overlay)) =
            (&self.window, &mut self.gpu, &mut self.overlay)
        else {
            return;
        };

        // --- Timing ---
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            overlay.record_frame(now.duration_since(last).as_secs_f64());
        }
        self.last_frame_time = Some(now);
        self.frame_count += 1;

        if overlay.present_mode_changed {
            overlay.present_mode_changed = false;
            if let Some(mode) = overlay.selected_present_mode() {
                gpu.set_present_mode(mode);
            }
        }

        // A skipped frame must not advance the animation.
        let Some(frame) = gpu.begin_frame() else {
            return;
        };
        let mut encoder = frame.encoder;

        // --- Animate ---
        overlay.phase_timers.begin();
        let slots = self.driver.next_frame();
        overlay.phase_timers.end(FramePhase::Animate);

        // --- Upload ---
        overlay.phase_timers.begin();
        let (width, height) = gpu.size();
        let mvp = transform::model_view_projection(self.driver.offset_x(), width, height);
        gpu.update_sprite(mvp, self.driver.recipe().shader_mode());
        overlay.phase_timers.end(FramePhase::GpuUpload);

        // --- Draw ---
        overlay.phase_timers.begin();
        gpu.draw_sprite(&mut encoder, &frame.view, slots.base, slots.effect);
        overlay.phase_timers.end(FramePhase::Draw);

        // --- Overlay ---
        overlay.phase_timers.begin();
        overlay.readout = Some(self.driver.readout());
        let (primitives, textures_delta, screen) = overlay.run_frame(window, width, height);
        let extra = overlay.prepare_egui(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &primitives,
            &textures_delta,
            &screen,
        );
        {
            let mut pass = GpuState::begin_egui_pass(&mut encoder, &frame.view);
            overlay.render_egui(&mut pass, &primitives, &screen);
        }
        window.pre_present_notify();
        gpu.finish_frame(encoder, frame.output, extra);
        overlay.free_textures(&textures_delta);
        overlay.phase_timers.end(FramePhase::Overlay);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.init_error.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.overlay) {
            (Some(window), Some(overlay)) if overlay.visible => {
                overlay.on_window_event(window, &event)
            }
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                if !event.state.is_pressed() {
                    return;
                }
                if let Some(action) = input::action_for_key(event.physical_key) {
                    self.handle_action(event_loop, action);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Shutting down after {} frames", self.frame_count);
        // GPU resources must go before the window they render to.
        self.overlay = None;
        self.gpu = None;
        self.window = None;
    }
}

/// Entry point. Create the event loop and run.
pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(args);
    event_loop.run_app(&mut app)?;
    if let Some(e) = app.init_error.take() {
        return Err(e.into());
    }
    Ok(())
}
