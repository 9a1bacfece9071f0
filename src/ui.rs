// ============================================================================
// ui.rs — bouncelab
// egui control panel: simulation control, ensemble parameters, and an
// optional analysis panel with live stats and time-series plots.
// ============================================================================

use egui_plot::{Line, Plot, PlotPoints};

use crate::config::{SimulationParams, MIN_BALL_COUNT};
use crate::diagnostics::{DiagHistory, DiagRecord};

/// UI-side state: panel visibility and one-shot action requests the app
/// consumes at the start of the next frame.
pub struct UiState {
    pub show_panel: bool,
    pub show_analysis: bool,
    pub respawn_requested: bool,
    pub step_requested: bool,
    pub history: DiagHistory,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_panel: true,
            show_analysis: false,
            respawn_requested: false,
            step_requested: false,
            history: DiagHistory::default(),
        }
    }
}

/// Main entry point for rendering all panels.
pub fn render_ui(
    ctx: &egui::Context,
    params: &mut SimulationParams,
    ui_state: &mut UiState,
    fps: f32,
    frame: u64,
    live_count: usize,
) {
    if !ui_state.show_panel {
        render_minimal_overlay(ctx, params, fps, frame);
        return;
    }

    render_left_panel(ctx, params, ui_state, live_count);

    if ui_state.show_analysis {
        render_analysis_panel(ctx, ui_state, fps, frame);
    }
}

// ======================== Minimal Overlay ========================

fn render_minimal_overlay(ctx: &egui::Context, params: &SimulationParams, fps: f32, frame: u64) {
    egui::Area::new(egui::Id::new("minimal_overlay"))
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(220, 220, 220));
            let pause_str = if params.paused { " [PAUSED]" } else { "" };
            ui.label(
                egui::RichText::new(format!(
                    "F: {}  FPS: {:.0}{}  | F1: Panel",
                    frame, fps, pause_str,
                ))
                .monospace()
                .size(13.0),
            );
        });
}

// ======================== Left Panel ========================

fn render_left_panel(
    ctx: &egui::Context,
    params: &mut SimulationParams,
    ui_state: &mut UiState,
    live_count: usize,
) {
    egui::SidePanel::left("control_panel")
        .default_width(240.0)
        .min_width(200.0)
        .max_width(360.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Ball Pit");
                ui.separator();

                render_control_section(ui, params, ui_state);
                ui.separator();
                render_ensemble_section(ui, params, live_count);
                ui.separator();
                render_view_toggles(ui, ui_state);

                ui.add_space(10.0);
            });
        });
}

fn render_control_section(ui: &mut egui::Ui, params: &mut SimulationParams, ui_state: &mut UiState) {
    ui.collapsing("Control", |ui| {
        ui.horizontal(|ui| {
            let play_label = if params.paused { "Play" } else { "Pause" };
            if ui.button(play_label).clicked() {
                params.paused = !params.paused;
                log::info!("{}", if params.paused { "Paused" } else { "Resumed" });
            }
            if ui.button("Step").clicked() {
                ui_state.step_requested = true;
                params.paused = true;
            }
            if ui.button("Respawn").clicked() {
                ui_state.respawn_requested = true;
            }
        });
    });
}

fn render_ensemble_section(ui: &mut egui::Ui, params: &mut SimulationParams, live_count: usize) {
    ui.collapsing("Ensemble", |ui| {
        if ui.checkbox(&mut params.gravity_enabled, "Gravity").changed() {
            log::info!(
                "Gravity: {}",
                if params.gravity_enabled { "ON" } else { "OFF" }
            );
        }

        ui.horizontal(|ui| {
            ui.label("Balls:");
            ui.add(
                egui::DragValue::new(&mut params.target_ball_count).range(MIN_BALL_COUNT..=512),
            );
        });

        ui.label(
            egui::RichText::new(format!("Live: {}", live_count))
                .small()
                .color(egui::Color32::from_rgb(150, 200, 150)),
        );
    });
}

fn render_view_toggles(ui: &mut egui::Ui, ui_state: &mut UiState) {
    ui.collapsing("View", |ui| {
        ui.checkbox(&mut ui_state.show_analysis, "Analysis panel (F9)");
        ui.label(
            egui::RichText::new("Space: pause | G: gravity | R: respawn\nUp/Down: ball count | F1: hide panel")
                .small()
                .color(egui::Color32::GRAY),
        );
    });
}

// ======================== Analysis Panel ========================

fn render_analysis_panel(ctx: &egui::Context, ui_state: &mut UiState, fps: f32, frame: u64) {
    egui::SidePanel::right("analysis_panel")
        .default_width(300.0)
        .min_width(220.0)
        .max_width(460.0)
        .show(ctx, |ui| {
            ui.heading("Analysis");
            ui.separator();

            if ui_state.history.records().is_empty() {
                ui.label("No samples yet.");
                return;
            }

            if let Some(last) = ui_state.history.last() {
                egui::Grid::new("live_stats")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        stat_row(ui, "Frame", &format!("{}", frame));
                        stat_row(ui, "FPS", &format!("{:.0}", fps));
                        stat_row(ui, "Balls", &format!("{}", last.ball_count));
                        stat_row(ui, "Kinetic E", &format!("{:.6}", last.kinetic_energy));
                        stat_row(ui, "|Momentum|", &format!("{:.5}", last.momentum_mag));
                    });
            }
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                render_plot(ui, "Ball Count", ui_state.history.records(), |r| {
                    r.ball_count as f64
                });
                render_plot(ui, "Kinetic Energy", ui_state.history.records(), |r| {
                    r.kinetic_energy as f64
                });
                render_plot(ui, "Momentum", ui_state.history.records(), |r| {
                    r.momentum_mag as f64
                });
                render_plot(ui, "FPS", ui_state.history.records(), |r| r.fps as f64);
            });
        });
}

fn stat_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(label);
    ui.label(egui::RichText::new(value).monospace());
    ui.end_row();
}

fn render_plot<F>(ui: &mut egui::Ui, title: &str, history: &[DiagRecord], value_fn: F)
where
    F: Fn(&DiagRecord) -> f64,
{
    let points: PlotPoints = history
        .iter()
        .map(|r| [r.frame as f64, value_fn(r)])
        .collect();

    Plot::new(format!("plot_{}", title))
        .height(100.0)
        .show_axes(true)
        .show_grid(true)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name(title));
        });
    ui.label(egui::RichText::new(title).small().strong());
    ui.add_space(4.0);
}
