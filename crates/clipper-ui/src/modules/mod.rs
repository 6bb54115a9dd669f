// crates/clipper-ui/src/modules/mod.rs
//
// Panel registry. Each panel is a concrete field on ClipperApp; to add one:
//   1. Create modules/mypanel.rs implementing EditorModule
//   2. Add `pub mod mypanel;` below
//   3. Add the field and its ui() call in app.rs

pub mod file_module;
pub mod selection_module;
pub mod export_module;
pub mod preview_module;

use clipper_core::commands::EditorCommand;
use clipper_core::state::AppState;
use egui::Ui;

/// Every panel implements this trait.
/// Modules read state, emit commands; they never mutate state directly.
pub trait EditorModule {
    fn name(&self) -> &str;
    fn ui(
        &mut self,
        ui:    &mut Ui,
        state: &AppState,
        cmd:   &mut Vec<EditorCommand>,
    );
}
