// crates/clipper-core/src/preview.rs
//
// Preview Player logic without the decoder: the playback state machine and
// the frame pacing ticker. clipper-media's pump thread owns one of each per
// open preview window and drives them with real frames.
//
//   Stopped ──open──▶ Playing ⇄ Paused
//      ▲                 │        │
//      └──────close──────┴────────┘
//
// Reaching the end of the interval is not a stop: the session loops back to
// the start and keeps playing until the window is closed.

use std::time::{Duration, Instant};

use crate::interval::Interval;

/// Used when the source does not report a usable frame rate.
pub const FALLBACK_FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// What the pump should do with a frame it just decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameAction {
    /// Inside the interval: display it.
    Show(f64),
    /// At or past the end: re-seek to `start` and pull again.
    LoopToStart(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSession {
    interval: Interval,
    playhead: f64,
    state:    PlaybackState,
}

impl PreviewSession {
    /// Open a session on a validated interval. Starts in `Playing` at `start`.
    pub fn open(interval: Interval) -> Self {
        Self { interval, playhead: interval.start, state: PlaybackState::Playing }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    /// Only a playing session pulls frames on a tick.
    pub fn wants_frame(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn toggle_play(&mut self) -> PlaybackState {
        self.state = match self.state {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused  => PlaybackState::Playing,
            PlaybackState::Stopped => PlaybackState::Stopped,
        };
        self.state
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn play(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Back to `start` and playing. Returns the timestamp to seek to.
    pub fn restart(&mut self) -> f64 {
        if self.state != PlaybackState::Stopped {
            self.state = PlaybackState::Playing;
        }
        self.playhead = self.interval.start;
        self.playhead
    }

    pub fn close(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Classify a decoded frame. `None` stands for end of stream, which loops
    /// the same way as running past `end`.
    pub fn on_decoded(&mut self, timestamp: Option<f64>) -> FrameAction {
        match timestamp {
            Some(ts) if ts < self.interval.end => {
                self.playhead = ts;
                FrameAction::Show(ts)
            }
            _ => {
                self.playhead = self.interval.start;
                FrameAction::LoopToStart(self.interval.start)
            }
        }
    }

    /// Manual seek from the progress bar. Returns the absolute timestamp.
    /// Play/pause state is left alone.
    pub fn seek_fraction(&mut self, fraction: f32) -> f64 {
        self.playhead = self.interval.at_fraction(fraction);
        self.playhead
    }

    /// Playhead position within the interval, `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.interval.fraction_of(self.playhead)
    }
}

/// Frame interval for a declared frame rate.
///
/// ```
/// use std::time::Duration;
/// use clipper_core::preview::{frame_interval, FALLBACK_FRAME_INTERVAL};
/// assert_eq!(frame_interval(25.0), Duration::from_millis(40));
/// assert_eq!(frame_interval(0.0), FALLBACK_FRAME_INTERVAL);
/// ```
pub fn frame_interval(fps: f64) -> Duration {
    if fps.is_finite() && fps >= 1.0 {
        Duration::from_secs_f64(1.0 / fps)
    } else {
        FALLBACK_FRAME_INTERVAL
    }
}

/// Fixed-interval deadline clock for frame pacing.
///
/// The pump asks how long until the next deadline, waits that long for a
/// command, and advances the ticker when the wait times out. A slow frame
/// pushes the next deadline out instead of firing a burst to catch up.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next:     Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, next: now + interval }
    }

    pub fn from_fps(fps: f64, now: Instant) -> Self {
        Self::new(frame_interval(fps), now)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left before the next tick is due; zero if overdue.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Schedule the following tick after one fired at `now`.
    pub fn advance(&mut self, now: Instant) {
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
    }

    /// Restart the cadence from `now` (after resume or seek).
    pub fn reset(&mut self, now: Instant) {
        self.next = now + self.interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PreviewSession {
        PreviewSession::open(Interval::new(10.0, 20.0))
    }

    #[test]
    fn opens_playing_at_start() {
        let s = session();
        assert_eq!(s.state(), PlaybackState::Playing);
        assert_eq!(s.playhead(), 10.0);
        assert!(s.wants_frame());
    }

    #[test]
    fn paused_session_pulls_nothing() {
        let mut s = session();
        assert_eq!(s.toggle_play(), PlaybackState::Paused);
        assert!(!s.wants_frame());
        assert_eq!(s.toggle_play(), PlaybackState::Playing);
    }

    #[test]
    fn reaching_end_loops_instead_of_stopping() {
        let mut s = session();
        assert_eq!(s.on_decoded(Some(19.96)), FrameAction::Show(19.96));
        assert_eq!(s.on_decoded(Some(20.0)), FrameAction::LoopToStart(10.0));
        assert_eq!(s.state(), PlaybackState::Playing);
        assert_eq!(s.playhead(), 10.0);
    }

    #[test]
    fn end_of_stream_loops_too() {
        let mut s = session();
        assert_eq!(s.on_decoded(None), FrameAction::LoopToStart(10.0));
        assert_eq!(s.state(), PlaybackState::Playing);
    }

    #[test]
    fn seek_maps_fraction_into_interval_and_keeps_state() {
        let mut s = session();
        s.pause();
        assert_eq!(s.seek_fraction(0.25), 12.5);
        assert_eq!(s.state(), PlaybackState::Paused);
        assert_eq!(s.progress(), 0.25);
        assert_eq!(s.seek_fraction(1.5), 20.0);
    }

    #[test]
    fn restart_resumes_playback() {
        let mut s = session();
        s.on_decoded(Some(15.0));
        s.pause();
        assert_eq!(s.restart(), 10.0);
        assert_eq!(s.state(), PlaybackState::Playing);
    }

    #[test]
    fn closed_session_stays_closed() {
        let mut s = session();
        s.close();
        s.play();
        assert_eq!(s.toggle_play(), PlaybackState::Stopped);
        s.restart();
        assert_eq!(s.state(), PlaybackState::Stopped);
    }

    #[test]
    fn frame_interval_falls_back_for_unusable_rates() {
        assert_eq!(frame_interval(f64::NAN), FALLBACK_FRAME_INTERVAL);
        assert_eq!(frame_interval(0.5), FALLBACK_FRAME_INTERVAL);
        assert_eq!(frame_interval(50.0), Duration::from_millis(20));
    }

    #[test]
    fn ticker_counts_down_and_does_not_burst() {
        let t0 = Instant::now();
        let mut t = Ticker::new(Duration::from_millis(40), t0);
        assert_eq!(t.until_next(t0), Duration::from_millis(40));
        assert!(!t.is_due(t0 + Duration::from_millis(39)));
        assert!(t.is_due(t0 + Duration::from_millis(40)));

        // Fired on time: next deadline is one interval later.
        t.advance(t0 + Duration::from_millis(40));
        assert_eq!(t.until_next(t0 + Duration::from_millis(40)), Duration::from_millis(40));

        // Fired very late: schedule from now rather than replaying missed ticks.
        let late = t0 + Duration::from_millis(500);
        t.advance(late);
        assert_eq!(t.until_next(late), Duration::from_millis(40));
    }
}
