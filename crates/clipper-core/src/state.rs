// crates/clipper-core/src/state.rs
//
// Runtime application state: no egui, no ffmpeg, no runtime handles.
// Modules read &AppState; only app.rs (via these methods) mutates it.
// Nothing here is persisted: the loaded file and interval start fresh on
// every launch. User preferences live in config::Settings instead.

use std::path::PathBuf;
use uuid::Uuid;

use crate::commands::EditorCommand;
use crate::error::CutError;
use crate::export::{ExportFormat, ExportRequest};
use crate::interval::{Interval, IntervalModel, MediaFile};
use crate::selection::{commit_drag, overlay_span, DragGesture, SelectionView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line status under the export panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Idle,
    Running { job_id: Uuid, percent: f32 },
    Done    { path: PathBuf },
    Failed  { message: String },
}

impl ExportStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ExportStatus::Running { .. })
    }
}

/// UI-side mirror of the preview pump. The pump owns the real PreviewSession;
/// this only tracks what the window needs to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub session:    Uuid,
    pub title:      String,
    pub interval:   Interval,
    pub playing:    bool,
    /// Timestamp of the last frame shown, seconds.
    pub playhead:   f64,
    pub frame_size: Option<(u32, u32)>,
}

impl PreviewView {
    pub fn progress(&self) -> f32 {
        self.interval.fraction_of(self.playhead)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub model:         Option<IntervalModel>,
    pub selection:     SelectionView,
    /// Active pointer gesture on the waveform canvas.
    pub drag:          Option<DragGesture>,
    /// Uncommitted (start, end) entry text.
    pub draft:         Option<(String, String)>,
    pub output_name:   String,
    pub output_format: ExportFormat,
    pub export:        ExportStatus,
    pub status:        Option<StatusMessage>,
    /// Latest probe request. Results carrying any other id are stale.
    pub pending_probe: Option<(Uuid, PathBuf)>,
    pub preview:       Option<PreviewView>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            model:         None,
            selection:     SelectionView::default(),
            drag:          None,
            draft:         None,
            output_name:   "clip".to_string(),
            output_format: ExportFormat::Mp4,
            export:        ExportStatus::Idle,
            status:        None,
            pending_probe: None,
            preview:       None,
        }
    }
}

impl AppState {
    pub fn duration(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.duration())
    }

    pub fn set_error(&mut self, err: &CutError) {
        tracing::warn!(error = %err, "action failed");
        self.status = Some(StatusMessage::error(err.to_string()));
    }

    // ── File ──────────────────────────────────────────────────────────────

    pub fn begin_probe(&mut self, request: Uuid, path: PathBuf) {
        self.status = Some(StatusMessage::info(format!("Reading {}…", path.display())));
        self.pending_probe = Some((request, path));
    }

    /// Install a freshly probed file. Returns false for stale results.
    pub fn apply_probe(&mut self, request: Uuid, path: PathBuf, duration: f64) -> bool {
        if !self.is_current_probe(request) {
            return false;
        }
        self.pending_probe = None;
        if duration <= 0.0 {
            self.set_error(&CutError::SourceUnreadable {
                path,
                reason: "no duration".into(),
            });
            return false;
        }
        let model = IntervalModel::new(MediaFile::new(path, duration));
        self.selection.publish(&model);
        self.model  = Some(model);
        self.drag   = None;
        self.draft  = None;
        self.status = None;
        true
    }

    /// Probe failure leaves any previously loaded file in place.
    pub fn probe_failed(&mut self, request: Uuid, err: &CutError) -> bool {
        if !self.is_current_probe(request) {
            return false;
        }
        self.pending_probe = None;
        self.set_error(err);
        true
    }

    fn is_current_probe(&self, request: Uuid) -> bool {
        matches!(&self.pending_probe, Some((id, _)) if *id == request)
    }

    // ── Selection ─────────────────────────────────────────────────────────

    /// Commit the text entries. On failure the model is untouched and the
    /// entries snap back to the model's values.
    pub fn commit_text(&mut self, start: &str, end: &str) -> Result<Interval, CutError> {
        let Some(model) = self.model.as_mut() else {
            return Err(CutError::MissingInput("file"));
        };
        let result = model.set_from_text(start, end);
        self.selection.publish(model);
        self.draft = None;
        result
    }

    pub fn edit_text(&mut self, start: String, end: String) {
        self.draft = Some((start, end));
    }

    /// Commit a pending draft, if any. `Ok(())` when there was nothing to do.
    pub fn flush_draft(&mut self) -> Result<(), CutError> {
        match self.draft.take() {
            Some((start, end)) => self.commit_text(&start, &end).map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn drag_begin(&mut self, x: f32, width: f32) {
        if self.model.is_some() && width > 0.0 {
            self.drag = Some(DragGesture::begin(x, width));
        }
    }

    pub fn drag_move(&mut self, x: f32, width: f32) {
        if let Some(g) = self.drag.as_mut() {
            g.update(x, width);
        }
    }

    pub fn drag_end(&mut self, x: f32, width: f32) -> Option<Interval> {
        let mut gesture = self.drag.take()?;
        gesture.width = width;
        let model = self.model.as_mut()?;
        self.draft = None;
        Some(commit_drag(model, &mut self.selection, gesture, x))
    }

    /// Overlay edges for the canvas: the live gesture while dragging,
    /// otherwise derived from the model.
    pub fn overlay(&self, width: f32) -> Option<(f32, f32)> {
        if let Some(g) = &self.drag {
            return Some(g.span());
        }
        self.model.as_ref().map(|m| overlay_span(m, width))
    }

    // ── Export ────────────────────────────────────────────────────────────

    /// Snapshot everything into a validated request.
    pub fn export_request(&self, output_dir: PathBuf) -> Result<ExportRequest, CutError> {
        let model = self.model.as_ref().ok_or(CutError::MissingInput("file"))?;
        ExportRequest::new(model, output_dir, &self.output_name, self.output_format)
    }

    pub fn export_started(&mut self, job_id: Uuid) {
        self.export = ExportStatus::Running { job_id, percent: 0.0 };
        self.status = Some(StatusMessage::info("Processing…"));
    }

    pub fn export_progress(&mut self, job_id: Uuid, percent: f32) {
        if let ExportStatus::Running { job_id: id, percent: p } = &mut self.export {
            if *id == job_id {
                *p = percent;
            }
        }
    }

    pub fn export_done(&mut self, job_id: Uuid, path: PathBuf) {
        if self.is_current_export(job_id) {
            self.status = Some(StatusMessage::success(format!("Saved {}", path.display())));
            self.export = ExportStatus::Done { path };
        }
    }

    pub fn export_failed(&mut self, job_id: Uuid, err: &CutError) {
        if self.is_current_export(job_id) {
            self.export = ExportStatus::Failed { message: err.to_string() };
            self.set_error(err);
        }
    }

    fn is_current_export(&self, job_id: Uuid) -> bool {
        matches!(self.export, ExportStatus::Running { job_id: id, .. } if id == job_id)
    }

    // ── Preview ───────────────────────────────────────────────────────────

    /// Validated source + interval for a new preview window.
    pub fn preview_target(&self) -> Result<(MediaFile, Interval), CutError> {
        let model = self.model.as_ref().ok_or(CutError::MissingInput("file"))?;
        let interval = model.validate_for_export()?;
        Ok((model.media().clone(), interval))
    }

    pub fn preview_started(&mut self, session: Uuid, media: &MediaFile, interval: Interval) {
        self.preview = Some(PreviewView {
            session,
            title:      format!("Preview: {}", media.display_name()),
            interval,
            playing:    true,
            playhead:   interval.start,
            frame_size: None,
        });
    }

    /// Mutable access to the open preview, if `session` is still the open one.
    pub fn preview_for(&mut self, session: Uuid) -> Option<&mut PreviewView> {
        self.preview.as_mut().filter(|p| p.session == session)
    }
}

/// Commands that must flush the text entries into the model first, so what
/// the user sees typed is what gets cut or previewed.
pub fn commits_text_first(cmd: &EditorCommand) -> bool {
    matches!(cmd, EditorCommand::StartExport | EditorCommand::OpenPreview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RangeError;
    use crate::helpers::time::parse_time;

    fn loaded() -> AppState {
        let mut s = AppState::default();
        let id = Uuid::new_v4();
        s.begin_probe(id, PathBuf::from("/m/talk.mp4"));
        assert!(s.apply_probe(id, PathBuf::from("/m/talk.mp4"), 80.0));
        s
    }

    #[test]
    fn probe_initialises_full_interval_and_publishes() {
        let s = loaded();
        assert_eq!(s.model.as_ref().unwrap().interval(), Interval::new(0.0, 80.0));
        assert_eq!(s.selection.end_label, "End: 00:01:20");
        assert!(s.pending_probe.is_none());
    }

    #[test]
    fn stale_probe_results_are_ignored() {
        let mut s = loaded();
        let current = Uuid::new_v4();
        s.begin_probe(current, PathBuf::from("/m/b.mov"));
        assert!(!s.apply_probe(Uuid::new_v4(), PathBuf::from("/m/old.mov"), 5.0));
        assert_eq!(s.duration(), Some(80.0));
        assert!(s.apply_probe(current, PathBuf::from("/m/b.mov"), 12.0));
        assert_eq!(s.duration(), Some(12.0));
    }

    #[test]
    fn zero_duration_probe_loads_nothing() {
        let mut s = AppState::default();
        let id = Uuid::new_v4();
        s.begin_probe(id, PathBuf::from("/m/x.wav"));
        assert!(!s.apply_probe(id, PathBuf::from("/m/x.wav"), 0.0));
        assert!(s.model.is_none());
        assert_eq!(s.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn failed_text_commit_reverts_entries() {
        let mut s = loaded();
        s.commit_text("00:00:10", "00:00:20").unwrap();
        let rev = s.selection.revision;
        let err = s.commit_text("10s", "00:00:30").unwrap_err();
        assert!(matches!(err, CutError::Format { .. }));
        assert_eq!(s.selection.start_text, "00:00:10");
        assert_eq!(s.selection.end_text, "00:00:20");
        assert!(s.selection.revision > rev);
    }

    #[test]
    fn flushing_a_draft_commits_it_once() {
        let mut s = loaded();
        s.edit_text("00:00:05".into(), "00:00:09".into());
        assert_eq!(s.model.as_ref().unwrap().interval(), Interval::new(0.0, 80.0));
        s.flush_draft().unwrap();
        assert_eq!(s.model.as_ref().unwrap().interval(), Interval::new(5.0, 9.0));
        assert!(s.draft.is_none());
        assert_eq!(s.flush_draft(), Ok(()));
    }

    #[test]
    fn bad_draft_blocks_with_format_error() {
        let mut s = loaded();
        s.edit_text("00:00:05".into(), "oops".into());
        assert!(matches!(s.flush_draft(), Err(CutError::Format { .. })));
        assert_eq!(s.selection.end_text, "00:01:20");
    }

    #[test]
    fn text_commit_without_file_is_missing_input() {
        let mut s = AppState::default();
        assert_eq!(s.commit_text("0:0:0", "0:0:1"), Err(CutError::MissingInput("file")));
    }

    #[test]
    fn overlay_follows_drag_then_model() {
        let mut s = loaded();
        s.drag_begin(300.0, 400.0);
        s.drag_move(100.0, 400.0);
        assert_eq!(s.overlay(400.0), Some((100.0, 300.0)));
        assert_eq!(s.model.as_ref().unwrap().interval(), Interval::new(0.0, 80.0));

        let iv = s.drag_end(100.0, 400.0).unwrap();
        assert_eq!(iv, Interval::new(20.0, 60.0));
        assert!(s.drag.is_none());
        assert_eq!(s.overlay(800.0), Some((200.0, 600.0)));
    }

    #[test]
    fn dragged_interval_matches_entry_text() {
        let mut s = AppState::default();
        let id = Uuid::new_v4();
        s.begin_probe(id, PathBuf::from("/m/short.mp4"));
        assert!(s.apply_probe(id, PathBuf::from("/m/short.mp4"), 42.9));

        s.drag_begin(37.0, 400.0);
        s.drag_end(400.0, 400.0).unwrap();
        let shown = Interval::new(
            parse_time(&s.selection.start_text).unwrap(),
            parse_time(&s.selection.end_text).unwrap(),
        );
        assert_eq!(s.model.as_ref().unwrap().interval(), shown);
        assert_eq!(shown, Interval::new(3.0, 42.0));

        let args = s.export_request(PathBuf::from("out")).unwrap().engine_args();
        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("-ss") + 1], "3.000");
        assert_eq!(args[pos("-t") + 1], "39.000");

        // Retyping only the start keeps the dragged end as displayed.
        let end_text = s.selection.end_text.clone();
        let iv = s.commit_text("00:00:05", &end_text).unwrap();
        assert_eq!(iv, Interval::new(5.0, 42.0));
    }

    #[test]
    fn drag_without_file_is_ignored() {
        let mut s = AppState::default();
        s.drag_begin(10.0, 400.0);
        assert!(s.drag.is_none());
        assert_eq!(s.drag_end(50.0, 400.0), None);
    }

    #[test]
    fn export_request_requires_valid_interval() {
        let mut s = loaded();
        s.commit_text("00:00:30", "00:00:30").unwrap();
        let err = s.export_request(PathBuf::from("out")).unwrap_err();
        assert_eq!(err, CutError::Range(RangeError::EndNotAfterStart { start: 30.0, end: 30.0 }));

        s.commit_text("00:00:30", "00:00:40").unwrap();
        let req = s.export_request(PathBuf::from("out")).unwrap();
        assert_eq!(req.output_path(), PathBuf::from("out").join("clip.mp4"));
    }

    #[test]
    fn export_lifecycle_ignores_other_jobs() {
        let mut s = loaded();
        let job = Uuid::new_v4();
        s.export_started(job);
        s.export_progress(Uuid::new_v4(), 90.0);
        s.export_progress(job, 40.0);
        assert_eq!(s.export, ExportStatus::Running { job_id: job, percent: 40.0 });

        s.export_done(Uuid::new_v4(), PathBuf::from("nope"));
        assert!(s.export.is_running());
        s.export_done(job, PathBuf::from("out/clip.mp4"));
        assert_eq!(s.export, ExportStatus::Done { path: PathBuf::from("out/clip.mp4") });
        assert_eq!(s.status.as_ref().unwrap().kind, StatusKind::Success);
    }

    #[test]
    fn preview_target_uses_export_validation() {
        let mut s = loaded();
        s.commit_text("00:00:10", "00:02:00").unwrap();
        assert!(matches!(
            s.preview_target(),
            Err(CutError::Range(RangeError::EndPastDuration { .. }))
        ));
        s.commit_text("00:00:10", "00:00:20").unwrap();
        let (media, iv) = s.preview_target().unwrap();
        let session = Uuid::new_v4();
        s.preview_started(session, &media, iv);
        assert_eq!(s.preview.as_ref().unwrap().title, "Preview: talk.mp4");
        assert!(s.preview_for(Uuid::new_v4()).is_none());
        s.preview_for(session).unwrap().playhead = 15.0;
        assert_eq!(s.preview.as_ref().unwrap().progress(), 0.5);
    }

    #[test]
    fn export_and_preview_flush_text_first() {
        assert!(commits_text_first(&EditorCommand::StartExport));
        assert!(commits_text_first(&EditorCommand::OpenPreview));
        assert!(!commits_text_first(&EditorCommand::ClearStatus));
    }
}
