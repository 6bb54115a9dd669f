// crates/clipper-ui/src/context.rs
//
// AppContext owns the runtime handles that are NOT part of AppState.
// ClipperApp holds one of these plus an AppState and the panels.
//
//   AppContext
//     ├── media_worker     the FFmpeg worker + all channel handles
//     └── preview_texture  GPU texture for the preview window's current frame
//
// Every result from the worker lands in AppState through the methods on
// AppState; nothing here decides what a stale id means.

use clipper_core::media_types::PlaybackFrame;
use clipper_core::state::AppState;
use clipper_media::{MediaResult, MediaWorker};
use eframe::egui;

pub struct AppContext {
    pub media_worker:    MediaWorker,
    /// Reused across frames with `TextureHandle::set` so a playing preview
    /// does not allocate a new texture per frame.
    pub preview_texture: Option<egui::TextureHandle>,
}

impl AppContext {
    pub fn new(media_worker: MediaWorker) -> Self {
        Self { media_worker, preview_texture: None }
    }

    /// Drop the preview texture. Called when the window closes or fails.
    pub fn clear_preview(&mut self) {
        self.preview_texture = None;
    }

    /// Drain the shared result channel into AppState. Called once per frame
    /// from `app::poll_media`, after preview frames.
    pub fn ingest_media_results(&mut self, state: &mut AppState, ctx: &egui::Context) {
        while let Ok(result) = self.media_worker.rx.try_recv() {
            match result {
                MediaResult::Probed { request, path, duration } => {
                    if state.apply_probe(request, path, duration) {
                        tracing::info!(duration, "media loaded");
                    }
                }
                MediaResult::ProbeFailed { request, error } => {
                    if !state.probe_failed(request, &error) {
                        tracing::debug!(%request, "stale probe failure ignored");
                    }
                }

                // ── Export ────────────────────────────────────────────────
                // AppState guards every arm on the running job id, so a late
                // result from an earlier job never clobbers the current one.
                MediaResult::ExportProgress { job_id, percent } => {
                    state.export_progress(job_id, percent);
                }
                MediaResult::ExportDone { job_id, path } => {
                    state.export_done(job_id, path);
                }
                MediaResult::ExportFailed { job_id, error } => {
                    state.export_failed(job_id, &error);
                }

                // ── Preview ───────────────────────────────────────────────
                MediaResult::PreviewOpened { session, fps, width, height } => {
                    if let Some(view) = state.preview_for(session) {
                        tracing::debug!(fps, width, height, "preview decoder ready");
                        view.frame_size = Some((width, height));
                    }
                }
                MediaResult::PreviewFailed { session, error } => {
                    if state.preview_for(session).is_some() {
                        state.preview = None;
                        self.clear_preview();
                        state.set_error(&error);
                    }
                }
            }
            ctx.request_repaint();
        }
    }

    /// Upload the newest frame for the open preview. Older queued frames are
    /// skipped; the pump already paces them, so only the latest matters.
    pub fn poll_preview_frames(&mut self, state: &mut AppState, ctx: &egui::Context) {
        let mut latest: Option<PlaybackFrame> = None;
        while let Ok(frame) = self.media_worker.preview_rx.try_recv() {
            latest = Some(frame);
        }
        let Some(frame) = latest else { return };

        let Some(view) = state.preview_for(frame.session) else {
            // Frame from a session that has since closed.
            return;
        };
        view.playhead   = frame.timestamp;
        view.frame_size = Some((frame.width, frame.height));

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match self.preview_texture.as_mut() {
            Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview_texture = Some(ctx.load_texture(
                    "preview-frame",
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
        ctx.request_repaint();
    }
}
