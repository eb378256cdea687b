pub mod ring;
pub mod stats;
pub mod timer;

use winit::window::Window;

use self::ring::RingBuffer;
use self::stats::{FpsLog, FrameStats};
use self::timer::{FramePhase, PhaseTimers};

use crate::config::Variant;
use crate::render::GpuState;
use crate::scene::AnimReadout;

/// Frame times averaged for the overlay stats.
const FRAME_HISTORY_LEN: usize = 300;
/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;

const PRESENT_MODES: [(wgpu::PresentMode, &str); 3] = [
    (wgpu::PresentMode::Fifo, "Fifo (vsync)"),
    (wgpu::PresentMode::Mailbox, "Mailbox"),
    (wgpu::PresentMode::Immediate, "Immediate"),
];

/// Entries of the present-mode combo that `supported` contains, in table order.
pub fn present_mode_choices(
    supported: &[wgpu::PresentMode],
) -> Vec<(wgpu::PresentMode, &'static str)> {
    PRESENT_MODES
        .iter()
        .copied()
        .filter(|(mode, _)| supported.contains(mode))
        .collect()
}

/// Debug overlay powered by egui.
pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,

    pub visible: bool,

    /// Rolling window of frame times (seconds).
    frame_times: RingBuffer<f64>,
    pub stats: FrameStats,

    /// Per-phase timers (updated by the app each frame).
    pub phase_timers: PhaseTimers,

    /// Present modes the surface supports, and the one picked in the combo.
    present_modes: Vec<(wgpu::PresentMode, &'static str)>,
    present_mode_index: usize,
    pub present_mode_changed: bool,

    /// Animation state (updated by the app each frame).
    pub variant: Variant,
    pub readout: Option<AnimReadout>,

    fps_log: FpsLog,
}

impl DebugOverlay {
    pub fn new(window: &Window, gpu: &GpuState, variant: Variant, visible: bool) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.target_format(),
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        let present_modes = present_mode_choices(gpu.present_modes());
        let present_mode_index = present_modes
            .iter()
            .position(|(mode, _)| *mode == gpu.surface_config.present_mode)
            .unwrap_or(0);

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            visible,
            frame_times: RingBuffer::new(FRAME_HISTORY_LEN),
            stats: FrameStats::default(),
            phase_timers: PhaseTimers::new(),
            present_modes,
            present_mode_index,
            present_mode_changed: false,
            variant,
            readout: None,
            fps_log: FpsLog::new(FPS_LOG_INTERVAL),
        }
    }

    /// Record a frame time, update rolling stats, and periodically log.
    pub fn record_frame(&mut self, dt: f64) {
        self.frame_times.push(dt);
        if let Some(stats) = FrameStats::from_times(self.frame_times.iter()) {
            self.stats = stats;
        }

        if let Some(s) = self.fps_log.push(dt) {
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                s.fps,
                s.avg_ms,
                s.min_ms,
                s.max_ms,
                s.total_frames,
            );
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::debug!("debug overlay {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        response.consumed
    }

    /// The present mode picked in the combo, if the surface offered any.
    pub fn selected_present_mode(&self) -> Option<wgpu::PresentMode> {
        self.present_modes
            .get(self.present_mode_index)
            .map(|(mode, _)| *mode)
    }

    /// Run the egui frame and produce paint output.
    /// Returns (clipped_primitives, textures_delta, screen_descriptor).
    pub fn run_frame(
        &mut self,
        window: &Window,
        screen_w: u32,
        screen_h: u32,
    ) -> (
        Vec<egui::epaint::ClippedPrimitive>,
        egui::TexturesDelta,
        egui_wgpu::ScreenDescriptor,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        // Snapshot read-only state so the UI closure doesn't borrow self.
        let ui_state = UiSnapshot {
            visible: self.visible,
            stats: self.stats,
            phase_durations: self.phase_timers.durations_us,
            phase_total: self.phase_timers.total_us(),
            variant: self.variant,
            readout: self.readout.clone(),
        };

        let mut present_mode_index = self.present_mode_index;

        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            draw_ui(ctx, &ui_state, &self.present_modes, &mut present_mode_index);
        });

        if present_mode_index != self.present_mode_index {
            self.present_mode_changed = true;
        }
        self.present_mode_index = present_mode_index;

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [screen_w, screen_h],
            pixels_per_point,
        };

        (clipped_primitives, full_output.textures_delta, screen_descriptor)
    }

    /// Upload egui textures and buffers. Call before the egui render pass.
    pub fn prepare_egui(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::epaint::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor)
    }

    /// Render egui into the given render pass.
    pub fn render_egui(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::epaint::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, textures_delta: &egui::TexturesDelta) {
        for &id in &textures_delta.free {
            self.egui_renderer.free_texture(&id);
        }
    }
}

// ---------------------------------------------------------------------------
// UI snapshot + free-function draw (avoids borrow conflicts with egui_ctx)
// ---------------------------------------------------------------------------

struct UiSnapshot {
    visible: bool,
    stats: FrameStats,
    phase_durations: [f64; FramePhase::COUNT],
    phase_total: f64,
    variant: Variant,
    readout: Option<AnimReadout>,
}

fn draw_ui(
    ctx: &egui::Context,
    s: &UiSnapshot,
    present_modes: &[(wgpu::PresentMode, &'static str)],
    present_mode_index: &mut usize,
) {
    if !s.visible {
        return;
    }

    let panel_frame = egui::Frame::NONE
        .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 20, 220))
        .corner_radius(6.0)
        .inner_margin(10.0);

    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .default_width(300.0)
        .resizable(true)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(220));

            // --- Performance ---
            ui.heading("Performance");
            ui.label(format!("FPS: {:.1}", s.stats.fps));
            ui.label(format!(
                "Frame: {:.2}ms avg | {:.2} min | {:.2} max",
                s.stats.avg * 1000.0,
                s.stats.min * 1000.0,
                s.stats.max * 1000.0,
            ));
            ui.add_space(4.0);

            // --- Phase timers ---
            ui.heading("Phases");
            let total = s.phase_total.max(1.0);
            for phase in FramePhase::ALL {
                let us = s.phase_durations[phase as usize];
                ui.label(
                    egui::RichText::new(format!(
                        "{:<11}{:>6.0}us ({:>2.0}%)",
                        phase.label(),
                        us,
                        us / total * 100.0
                    ))
                    .monospace(),
                );
            }
            ui.add_space(4.0);

            // --- Animation ---
            ui.heading(format!("Animation ({})", s.variant.label()));
            match &s.readout {
                Some(AnimReadout::Keyboard {
                    active,
                    slot,
                    offset_x,
                    clips,
                }) => {
                    ui.label(format!(
                        "Active: {} | slot {} | x {:+.2}",
                        active.label(),
                        slot,
                        offset_x
                    ));
                    for (clip, counter, frame) in clips {
                        let text = egui::RichText::new(format!(
                            "{:<11}{:>7.1}  frame {}/{}",
                            clip.label(),
                            counter,
                            frame,
                            clip.frame_count()
                        ))
                        .monospace();
                        if clip == active {
                            ui.label(text.strong());
                        } else {
                            ui.label(text);
                        }
                    }
                }
                Some(AnimReadout::Auto {
                    sprite_counter,
                    sprite_frame,
                    effect_counter,
                    effect_frame,
                }) => {
                    ui.label(
                        egui::RichText::new(format!(
                            "Sprite {:>8.1}  frame {}",
                            sprite_counter, sprite_frame
                        ))
                        .monospace(),
                    );
                    ui.label(
                        egui::RichText::new(format!(
                            "Effect {:>8.1}  frame {}",
                            effect_counter, effect_frame
                        ))
                        .monospace(),
                    );
                }
                None => {
                    ui.label("-");
                }
            }
            ui.add_space(4.0);

            // --- Controls ---
            ui.heading("Controls");
            if let Some((_, selected)) = present_modes.get(*present_mode_index) {
                ui.horizontal(|ui| {
                    ui.label("Present:");
                    egui::ComboBox::from_id_salt("present_mode")
                        .selected_text(*selected)
                        .show_ui(ui, |ui| {
                            for (i, (_, label)) in present_modes.iter().enumerate() {
                                ui.selectable_value(present_mode_index, i, *label);
                            }
                        });
                });
            }
            ui.label("Arrows: Walk | Space/Shift: Attack");
            ui.label("F12: Toggle | ESC: Quit");
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::PresentMode;

    #[test]
    fn only_supported_present_modes_are_offered() {
        let choices = present_mode_choices(&[PresentMode::Fifo, PresentMode::Immediate]);
        let modes: Vec<_> = choices.iter().map(|(m, _)| *m).collect();
        assert_eq!(modes, vec![PresentMode::Fifo, PresentMode::Immediate]);
    }

    #[test]
    fn fifo_only_surface_offers_fifo() {
        let choices = present_mode_choices(&[PresentMode::Fifo]);
        assert_eq!(choices, vec![(PresentMode::Fifo, "Fifo (vsync)")]);
    }

    #[test]
    fn unknown_modes_are_ignored() {
        let choices = present_mode_choices(&[PresentMode::FifoRelaxed, PresentMode::Mailbox]);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].0, PresentMode::Mailbox);
    }
}
