// crates/clipper-ui/src/modules/export_module.rs
//
// Output name, container picker, Preview/Cut buttons, progress bar and the
// status line.
//
// The panel never validates anything itself: StartExport and OpenPreview go
// through app.rs, which flushes the text entries and builds the request.
// Only the enabled state of the Cut button is decided here, so a second
// export cannot be queued while one is running.

use super::EditorModule;
use crate::helpers::format::fit_path;
use crate::theme::{
    ACCENT, ACCENT_DIM, DARK_BG_2, DARK_BORDER, DARK_TEXT, DARK_TEXT_DIM, GREEN_DIM, RED_DIM,
    TRACK_BG, TRACK_FG,
};
use clipper_core::commands::EditorCommand;
use clipper_core::export::ALL_FORMATS;
use clipper_core::state::{AppState, ExportStatus, StatusKind};
use egui::{Color32, Margin, RichText, Stroke, Ui};

#[derive(Default)]
pub struct ExportModule {
    name_buf: String,
}

impl ExportModule {
    fn show_output_row(&mut self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        // Re-sync when app.rs changed the name (settings load).
        let editing = ui.memory(|m| m.has_focus(egui::Id::new("export_output_name")));
        if !editing && self.name_buf != state.output_name {
            self.name_buf = state.output_name.clone();
        }

        ui.horizontal(|ui| {
            ui.label(RichText::new("Output").size(11.0).color(DARK_TEXT_DIM));
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.name_buf)
                    .id(egui::Id::new("export_output_name"))
                    .hint_text("clip")
                    .desired_width(180.0),
            );
            if resp.changed() {
                cmd.push(EditorCommand::SetOutputName(self.name_buf.clone()));
            }

            let current = state.output_format;
            egui::ComboBox::from_id_salt("export_format")
                .selected_text(current.extension())
                .width(150.0)
                .show_ui(ui, |ui| {
                    for &fmt in ALL_FORMATS {
                        let label = format!("{}  ·  {}", fmt.extension(), fmt.policy_label());
                        if ui.selectable_label(fmt == current, label).clicked() && fmt != current {
                            cmd.push(EditorCommand::SetOutputFormat(fmt));
                        }
                    }
                });

            ui.label(
                RichText::new(current.policy_label())
                    .size(10.0)
                    .color(DARK_TEXT_DIM),
            );
        });
    }

    fn show_actions(&self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        let loaded  = state.model.is_some();
        let running = state.export.is_running();

        ui.horizontal(|ui| {
            let preview_btn = egui::Button::new(
                RichText::new("▶  Preview").size(12.0).color(DARK_TEXT),
            )
            .stroke(Stroke::new(1.0, DARK_BORDER))
            .fill(DARK_BG_2)
            .min_size(egui::vec2(110.0, 30.0));
            if ui.add_enabled(loaded, preview_btn).clicked() {
                cmd.push(EditorCommand::OpenPreview);
            }

            let cut_label = if running { "Processing…" } else { "✂  Cut" };
            let cut_btn = egui::Button::new(
                RichText::new(cut_label).size(12.0).strong().color(Color32::BLACK),
            )
            .fill(if running { ACCENT_DIM } else { ACCENT })
            .min_size(egui::vec2(110.0, 30.0));
            if ui.add_enabled(loaded && !running, cut_btn).clicked() {
                cmd.push(EditorCommand::StartExport);
            }
        });
    }

    fn show_progress(&self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        let fraction = match &state.export {
            ExportStatus::Running { percent, .. } => (percent / 100.0).clamp(0.0, 1.0),
            ExportStatus::Done { .. }             => 1.0,
            _                                      => 0.0,
        };

        ui.horizontal(|ui| {
            let bar_w = (ui.available_width() - 48.0).max(40.0);
            let (bar_rect, _) = ui.allocate_exact_size(
                egui::vec2(bar_w, 8.0),
                egui::Sense::hover(),
            );
            let p = ui.painter();
            p.rect_filled(bar_rect, 4.0, TRACK_BG);
            if fraction > 0.0 {
                let mut fill = bar_rect;
                fill.max.x = bar_rect.min.x + bar_rect.width() * fraction;
                p.rect_filled(fill, 4.0, TRACK_FG);
            }
            ui.label(
                RichText::new(format!("{:.0}%", fraction * 100.0))
                    .size(11.0)
                    .monospace()
                    .color(DARK_TEXT_DIM),
            );
        });

        match &state.export {
            ExportStatus::Done { path } => {
                // Leave room for the Dismiss button on the same row.
                let budget = (ui.available_width() - 140.0).max(0.0);
                banner(ui, Color32::from_rgb(30, 60, 40), GREEN_DIM,
                       &format!("✔  Saved: {}", fit_path(path, budget)), cmd);
            }
            ExportStatus::Failed { message } => {
                banner(ui, Color32::from_rgb(60, 25, 25), RED_DIM,
                       &format!("💥  {message}"), cmd);
            }
            _ => {}
        }
    }

    fn show_status(&self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        let Some(status) = &state.status else { return };
        let color = match status.kind {
            StatusKind::Info    => DARK_TEXT_DIM,
            StatusKind::Success => GREEN_DIM,
            StatusKind::Error   => RED_DIM,
        };
        ui.horizontal(|ui| {
            if ui.small_button("✕").on_hover_text("Dismiss").clicked() {
                cmd.push(EditorCommand::ClearStatus);
            }
            ui.add(egui::Label::new(RichText::new(&status.text).size(11.0).color(color)).wrap());
        });
    }
}

/// Coloured result frame with a Dismiss button.
fn banner(ui: &mut Ui, fill: Color32, accent: Color32, text: &str, cmd: &mut Vec<EditorCommand>) {
    ui.add_space(6.0);
    egui::Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1.0, accent))
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.add(egui::Label::new(RichText::new(text).size(11.0).color(accent)).wrap());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let dismiss = egui::Button::new(
                        RichText::new("Dismiss").size(11.0).color(DARK_TEXT_DIM),
                    )
                    .stroke(Stroke::new(1.0, DARK_BORDER))
                    .fill(DARK_BG_2);
                    if ui.add(dismiss).clicked() {
                        cmd.push(EditorCommand::ClearExportStatus);
                    }
                });
            });
        });
}

impl EditorModule for ExportModule {
    fn name(&self) -> &str { "Export" }

    fn ui(&mut self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        self.show_output_row(ui, state, cmd);
        ui.add_space(8.0);
        self.show_actions(ui, state, cmd);
        ui.add_space(8.0);
        self.show_progress(ui, state, cmd);
        ui.add_space(4.0);
        self.show_status(ui, state, cmd);
    }
}
