// crates/clipper-core/src/media_types.rs
//
// Types that flow across the channel between clipper-media and clipper-ui.
// No egui, no ffmpeg, just plain data.

use std::path::PathBuf;
use uuid::Uuid;

use crate::error::CutError;

/// Results sent from the MediaWorker background threads to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaResult {
    /// `request` is the id returned by `probe_file`; stale ids are ignored.
    Probed         { request: Uuid, path: PathBuf, duration: f64 },
    ProbeFailed    { request: Uuid, error: CutError },
    ExportProgress { job_id: Uuid, percent: f32 },
    ExportDone     { job_id: Uuid, path: PathBuf },
    ExportFailed   { job_id: Uuid, error: CutError },
    /// The preview decoder opened; `fps` is 0.0 when the source reports none.
    PreviewOpened  { session: Uuid, fps: f64, width: u32, height: u32 },
    PreviewFailed  { session: Uuid, error: CutError },
}

/// A decoded frame from the preview pipeline.
pub struct PlaybackFrame {
    pub session:   Uuid,
    pub timestamp: f64,
    pub width:     u32,
    pub height:    u32,
    pub data:      Vec<u8>, // RGBA
}
