// crates/clipper-ui/src/modules/file_module.rs
//
// Top row: Browse button, editable path field, duration readout.
// The path field is also an input: typing a path and pressing Enter loads it.

use super::EditorModule;
use crate::helpers::format::fit_path;
use crate::theme::{ACCENT, DARK_TEXT_DIM};
use clipper_core::commands::EditorCommand;
use clipper_core::helpers::time::format_time;
use clipper_core::state::AppState;
use egui::{RichText, Ui};
use std::path::PathBuf;

#[derive(Default)]
pub struct FileModule {
    path_text: String,
    /// Path the text was last synced from, so edits survive until a new
    /// file actually loads.
    synced:    Option<PathBuf>,
}

impl FileModule {
    fn current_path(state: &AppState) -> Option<PathBuf> {
        state.model.as_ref().map(|m| m.media().path.clone())
    }
}

impl EditorModule for FileModule {
    fn name(&self) -> &str { "File" }

    fn ui(&mut self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        let loaded = Self::current_path(state);
        if loaded != self.synced {
            self.path_text = loaded.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            self.synced = loaded;
        }

        ui.horizontal(|ui| {
            if ui.button("📂  Browse…").clicked() {
                cmd.push(EditorCommand::BrowseForFile);
            }

            let field_w = (ui.available_width() - 8.0).max(80.0);
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.path_text)
                    .hint_text("Choose a media file or drop one here")
                    .desired_width(field_w),
            );
            if let Some(p) = &self.synced {
                resp.clone().on_hover_text(p.display().to_string());
            }
            let entered = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let typed = self.path_text.trim();
            if entered && !typed.is_empty() {
                cmd.push(EditorCommand::SelectFile(PathBuf::from(typed)));
            }
        });

        ui.horizontal(|ui| {
            match state.duration() {
                Some(d) => {
                    ui.label(
                        RichText::new(format!("Media duration: {}", format_time(d)))
                            .size(12.0)
                            .color(ACCENT),
                    );
                }
                None => {
                    ui.label(RichText::new("Media duration: --:--:--").size(12.0).color(DARK_TEXT_DIM));
                }
            }
            if let Some((_, path)) = &state.pending_probe {
                ui.spinner();
                let max_px = ui.available_width();
                ui.label(
                    RichText::new(fit_path(path, max_px))
                        .size(11.0)
                        .color(DARK_TEXT_DIM),
                );
            }
        });
    }
}
