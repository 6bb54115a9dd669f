// crates/clipper-core/src/commands.rs
//
// Every user action in Clipper is expressed as an EditorCommand.
// Modules emit these; app.rs processes them after the UI pass.
// Adding a new feature = add a variant here + one match arm in app.rs.

use std::path::PathBuf;

use crate::export::ExportFormat;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // ── File ─────────────────────────────────────────────────────────────────
    /// Open the native file dialog. app.rs runs it so modules stay free of rfd.
    BrowseForFile,
    /// A path arrived from the dialog, drag-and-drop or the path field.
    /// Starts a probe; the model is only replaced once the probe succeeds.
    SelectFile(PathBuf),

    // ── Selection ────────────────────────────────────────────────────────────
    /// Entries were edited but not committed yet. Kept as a draft so export
    /// and preview can flush it before reading the model.
    EditTimeText   { start: String, end: String },
    /// Commit the text entries (Enter, focus loss, or right before export/preview).
    CommitTimeText { start: String, end: String },
    /// Pointer-down on the waveform canvas. `x` is canvas-local.
    DragBegin { x: f32, width: f32 },
    DragMove  { x: f32, width: f32 },
    /// Pointer-up. Only this one writes to the interval model.
    DragEnd   { x: f32, width: f32 },

    // ── Export ───────────────────────────────────────────────────────────────
    SetOutputName(String),
    SetOutputFormat(ExportFormat),
    /// Validate and launch the engine. Refused while another export is running.
    StartExport,
    /// Dismiss the done/error banner under the progress bar.
    ClearExportStatus,

    // ── Preview ──────────────────────────────────────────────────────────────
    /// Validate and open the preview window on the current interval.
    OpenPreview,
    TogglePreviewPlay,
    RestartPreview,
    /// Jump to a fraction `[0, 1]` of the interval.
    SeekPreview(f32),
    ClosePreview,

    // ── View ─────────────────────────────────────────────────────────────────
    ClearStatus,
}
