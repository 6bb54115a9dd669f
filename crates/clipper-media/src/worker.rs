// crates/clipper-media/src/worker.rs
//
// MediaWorker: owns the background threads. All public API that clipper-ui
// calls lives here.
//
//   probe_file    one short-lived thread per request → Probed / ProbeFailed
//   start_export  one thread per export run          → ExportProgress* then
//                                                       ExportDone / ExportFailed
//   preview pump  one long-lived thread, started in new(); owns the
//                 LiveDecoder while a preview window is open and sends
//                 PlaybackFrames on its own bounded channel
//
// Every long action is identified by a Uuid handed back to the caller, so
// the UI can ignore results from superseded requests.

use std::path::PathBuf;
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use uuid::Uuid;

use clipper_core::error::CutError;
use clipper_core::export::ExportRequest;
use clipper_core::interval::Interval;
use clipper_core::media_types::{MediaResult, PlaybackFrame};
use clipper_core::preview::{FrameAction, PlaybackState, PreviewSession, Ticker};

use crate::decode::{DecodedFrame, LiveDecoder};
use crate::probe::probe_media;
use crate::transcode::run_export;

// ── Internal types ────────────────────────────────────────────────────────────

enum PreviewCmd {
    Open { session: Uuid, path: PathBuf, interval: Interval },
    TogglePlay,
    Restart,
    Seek(f32),
    Close,
}

/// Everything the pump holds for one open preview window.
struct ActivePreview {
    session: Uuid,
    decoder: LiveDecoder,
    state:   PreviewSession,
    ticker:  Ticker,
}

// ── MediaWorker ───────────────────────────────────────────────────────────────

pub struct MediaWorker {
    /// Shared result channel: probes, export progress, preview lifecycle.
    pub rx:         Receiver<MediaResult>,
    tx:             Sender<MediaResult>,

    /// Dedicated frame channel for the preview pump.
    ///
    /// Capacity is small on purpose: frames are paced by the Ticker, the UI
    /// drains every repaint, and a frame that cannot be queued is dropped
    /// rather than delaying the pump.
    pub preview_rx: Receiver<PlaybackFrame>,
    preview_tx:     Sender<PreviewCmd>,

    shutdown:       Arc<AtomicBool>,
}

impl MediaWorker {
    pub fn new() -> Self {
        let (tx, rx)                    = bounded(512);
        let (preview_tx, cmd_rx)        = unbounded::<PreviewCmd>();
        let (frame_tx, preview_rx)      = bounded::<PlaybackFrame>(4);

        let pump_tx = tx.clone();
        thread::spawn(move || preview_pump(cmd_rx, frame_tx, pump_tx));

        Self {
            rx, tx, preview_rx, preview_tx,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.preview_tx.send(PreviewCmd::Close);
    }

    /// Probe `path` for its duration on a background thread.
    pub fn probe_file(&self, path: PathBuf) -> Uuid {
        let request = Uuid::new_v4();
        let tx = self.tx.clone();
        let sd = self.shutdown.clone();
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) { return; }
            let result = match probe_media(&path) {
                Ok(duration) => MediaResult::Probed { request, path, duration },
                Err(error)   => MediaResult::ProbeFailed { request, error },
            };
            let _ = tx.send(result);
        });
        request
    }

    /// Spawn a background thread that runs the engine for `req`.
    /// No cancellation and no timeout: it runs until ffmpeg exits.
    pub fn start_export(&self, req: ExportRequest, engine: PathBuf) -> Uuid {
        let job_id = Uuid::new_v4();
        let tx = self.tx.clone();
        let sd = self.shutdown.clone();
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) {
                let _ = tx.send(MediaResult::ExportFailed {
                    job_id,
                    error: CutError::Io {
                        context: "export".into(),
                        message: "worker shutting down".into(),
                    },
                });
                return;
            }

            // ffmpeg prints several status lines a second; only forward
            // changes of at least a tenth of a percent, plus the final 100.
            let mut last = -1.0_f32;
            let progress_tx = tx.clone();
            let result = run_export(&req, &engine, |percent| {
                if percent >= 100.0 || (percent - last).abs() >= 0.1 {
                    last = percent;
                    let _ = progress_tx.send(MediaResult::ExportProgress { job_id, percent });
                }
            });

            let _ = tx.send(match result {
                Ok(path)   => MediaResult::ExportDone { job_id, path },
                Err(error) => MediaResult::ExportFailed { job_id, error },
            });
        });
        job_id
    }

    /// Open a preview on `interval` of `path`, replacing any open one.
    pub fn open_preview(&self, path: PathBuf, interval: Interval) -> Uuid {
        let session = Uuid::new_v4();
        // Flush stale frames from the previous session.
        while self.preview_rx.try_recv().is_ok() {}
        let _ = self.preview_tx.send(PreviewCmd::Open { session, path, interval });
        session
    }

    pub fn toggle_preview(&self) {
        let _ = self.preview_tx.send(PreviewCmd::TogglePlay);
    }

    pub fn restart_preview(&self) {
        let _ = self.preview_tx.send(PreviewCmd::Restart);
    }

    pub fn seek_preview(&self, fraction: f32) {
        let _ = self.preview_tx.send(PreviewCmd::Seek(fraction));
    }

    pub fn close_preview(&self) {
        let _ = self.preview_tx.send(PreviewCmd::Close);
    }
}

impl Default for MediaWorker {
    fn default() -> Self {
        Self::new()
    }
}

// ── Preview pump ──────────────────────────────────────────────────────────────
//
// While playing, the pump waits for commands only until the next Ticker
// deadline; a timeout means "time for the next frame". While paused (or with
// no window open) it blocks on commands. Commands therefore never wait
// behind frame pacing, and pacing never depends on how often the UI repaints.

fn preview_pump(
    cmd_rx:    Receiver<PreviewCmd>,
    frame_tx:  Sender<PlaybackFrame>,
    result_tx: Sender<MediaResult>,
) {
    let mut active: Option<ActivePreview> = None;

    loop {
        let cmd = match active.as_ref() {
            Some(p) if p.state.wants_frame() => {
                match cmd_rx.recv_timeout(p.ticker.until_next(Instant::now())) {
                    Ok(cmd)                             => Some(cmd),
                    Err(RecvTimeoutError::Timeout)      => None,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
            _ => match cmd_rx.recv() {
                Ok(cmd) => Some(cmd),
                Err(_)  => return,
            },
        };

        let Some(cmd) = cmd else {
            // Tick.
            if let Some(p) = active.as_mut() {
                p.ticker.advance(Instant::now());
                p.play_next(&frame_tx);
            }
            continue;
        };

        match cmd {
            PreviewCmd::Open { session, path, interval } => {
                active = None;
                match LiveDecoder::open(&path) {
                    Ok(mut decoder) => {
                        decoder.seek(interval.start);
                        let (width, height) = decoder.size();
                        let fps = if decoder.fps.is_finite() { decoder.fps } else { 0.0 };
                        let _ = result_tx.send(MediaResult::PreviewOpened { session, fps, width, height });
                        tracing::info!(
                            "preview open {:.3}s..{:.3}s ← {}",
                            interval.start, interval.end, path.display()
                        );
                        let mut p = ActivePreview {
                            session,
                            decoder,
                            state:  PreviewSession::open(interval),
                            ticker: Ticker::from_fps(fps, Instant::now()),
                        };
                        p.play_next(&frame_tx);
                        active = Some(p);
                    }
                    Err(e) => {
                        tracing::warn!("preview open failed for {}: {e}", path.display());
                        let error = CutError::SourceUnreadable { path, reason: e.to_string() };
                        let _ = result_tx.send(MediaResult::PreviewFailed { session, error });
                    }
                }
            }
            PreviewCmd::TogglePlay => {
                if let Some(p) = active.as_mut() {
                    if p.state.toggle_play() == PlaybackState::Playing {
                        p.ticker.reset(Instant::now());
                    }
                }
            }
            PreviewCmd::Restart => {
                if let Some(p) = active.as_mut() {
                    let ts = p.state.restart();
                    p.decoder.seek(ts);
                    p.play_next(&frame_tx);
                    p.ticker.reset(Instant::now());
                }
            }
            PreviewCmd::Seek(fraction) => {
                if let Some(p) = active.as_mut() {
                    let ts = p.state.seek_fraction(fraction);
                    p.decoder.seek(ts);
                    // One frame right away, playing or not.
                    p.play_next(&frame_tx);
                    p.ticker.reset(Instant::now());
                }
            }
            PreviewCmd::Close => {
                if let Some(mut p) = active.take() {
                    p.state.close();
                    tracing::info!("preview closed");
                    // Decoder dropped here.
                }
            }
        }
    }
}

impl ActivePreview {
    /// Pull one frame and send it. Running past the interval (or off the end
    /// of the file) loops back to `start` and shows the first frame there.
    fn play_next(&mut self, frame_tx: &Sender<PlaybackFrame>) {
        // Two attempts: the frame we pull, and the first one after a loop.
        for _ in 0..2 {
            let frame = self.decoder.next_frame();
            match self.state.on_decoded(frame.as_ref().map(|f| f.timestamp)) {
                FrameAction::Show(_) => {
                    if let Some(f) = frame {
                        self.send(f, frame_tx);
                    }
                    return;
                }
                FrameAction::LoopToStart(start) => {
                    tracing::debug!("preview loop to {start:.3}s");
                    self.decoder.seek(start);
                }
            }
        }
    }

    fn send(&self, f: DecodedFrame, frame_tx: &Sender<PlaybackFrame>) {
        let frame = PlaybackFrame {
            session:   self.session,
            timestamp: f.timestamp,
            width:     f.width,
            height:    f.height,
            data:      f.data,
        };
        match frame_tx.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::debug!("preview frame dropped, UI behind"),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}
