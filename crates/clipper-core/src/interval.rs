// crates/clipper-core/src/interval.rs
//
// The Interval Model: the one place the selected start/end live.
//
// Three surfaces write to it (typed text, drag on the waveform canvas, and
// the reset on file selection). None of them talk to each other; after any
// write the selection presenter republishes every view from here.
//
// Ordering is not enforced on write. A drag always yields start <= end, but
// typed text can say anything; validate() is the gate that export and
// preview go through before they take their snapshot.

use std::path::PathBuf;

use crate::error::{CutError, RangeError};
use crate::helpers::geometry::pixel_to_time;
use crate::helpers::time::parse_time;

/// A probed source file. Replaced wholesale when the user picks another file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub path:     PathBuf,
    /// Total duration in seconds, always > 0 (unreadable files never get here).
    pub duration: f64,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>, duration: f64) -> Self {
        Self { path: path.into(), duration }
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Selected span in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end:   f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// Absolute timestamp for a fraction of the way through the span.
    /// `fraction` is clamped to `[0, 1]`.
    pub fn at_fraction(&self, fraction: f32) -> f64 {
        self.start + self.len() * fraction.clamp(0.0, 1.0) as f64
    }

    /// Where `t` sits within the span, as a fraction in `[0, 1]`.
    pub fn fraction_of(&self, t: f64) -> f32 {
        let len = self.len();
        if len <= 0.0 {
            return 0.0;
        }
        ((t - self.start) / len).clamp(0.0, 1.0) as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalModel {
    media:    MediaFile,
    interval: Interval,
}

impl IntervalModel {
    /// Fresh model for a newly probed file: the whole file is selected.
    pub fn new(media: MediaFile) -> Self {
        let interval = Interval::new(0.0, media.duration);
        Self { media, interval }
    }

    pub fn media(&self) -> &MediaFile {
        &self.media
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn duration(&self) -> f64 {
        self.media.duration
    }

    /// Parse both entries and store them. Nothing changes unless both parse.
    pub fn set_from_text(&mut self, start: &str, end: &str) -> Result<Interval, CutError> {
        let start = parse_time(start)?;
        let end   = parse_time(end)?;
        self.interval = Interval::new(start, end);
        Ok(self.interval)
    }

    /// Map a drag gesture to the interval. Pixel inputs may arrive in either
    /// order and outside the canvas; both are clamped to `[0, width]` and
    /// sorted before mapping. A zero-width canvas leaves the model untouched.
    ///
    /// Both ends are floored to whole seconds, the precision the entries
    /// display, so the stored interval is exactly what the text reads back as.
    pub fn set_from_drag(&mut self, pixel_a: f32, pixel_b: f32, canvas_width: f32) -> Interval {
        if canvas_width <= 0.0 {
            return self.interval;
        }
        let a = pixel_a.clamp(0.0, canvas_width);
        let b = pixel_b.clamp(0.0, canvas_width);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let duration = self.media.duration;
        self.interval = Interval::new(
            pixel_to_time(lo, canvas_width, duration).floor(),
            pixel_to_time(hi, canvas_width, duration).floor(),
        );
        self.interval
    }

    /// Gate for export and preview: `start < end <= duration`.
    pub fn validate_for_export(&self) -> Result<Interval, CutError> {
        let Interval { start, end } = self.interval;
        if end <= start {
            return Err(RangeError::EndNotAfterStart { start, end }.into());
        }
        if end > self.media.duration {
            return Err(RangeError::EndPastDuration { end, duration: self.media.duration }.into());
        }
        Ok(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(duration: f64) -> IntervalModel {
        IntervalModel::new(MediaFile::new("/tmp/in.mp4", duration))
    }

    #[test]
    fn new_model_selects_whole_file() {
        let m = model(42.5);
        assert_eq!(m.interval(), Interval::new(0.0, 42.5));
    }

    #[test]
    fn text_sets_both_ends() {
        let mut m = model(120.0);
        let iv = m.set_from_text("00:00:10", "00:01:05.5").unwrap();
        assert_eq!(iv, Interval::new(10.0, 65.5));
    }

    #[test]
    fn bad_text_leaves_model_unchanged() {
        let mut m = model(120.0);
        m.set_from_text("00:00:10", "00:00:20").unwrap();
        assert!(m.set_from_text("00:00:30", "later").is_err());
        assert_eq!(m.interval(), Interval::new(10.0, 20.0));
    }

    #[test]
    fn drag_direction_does_not_matter() {
        let mut ltr = model(100.0);
        let mut rtl = model(100.0);
        let a = ltr.set_from_drag(100.0, 300.0, 400.0);
        let b = rtl.set_from_drag(300.0, 100.0, 400.0);
        assert_eq!(a, b);
        assert_eq!(a, Interval::new(25.0, 75.0));
    }

    #[test]
    fn drag_commits_stay_within_bounds() {
        let duration = 37.0;
        let width = 640.0;
        let gestures = [
            (0.0, 640.0), (640.0, 0.0), (-50.0, 100.0), (100.0, -50.0),
            (600.0, 900.0), (900.0, 600.0), (-10.0, 1000.0), (320.0, 320.0),
        ];
        for (a, b) in gestures {
            let iv = model(duration).set_from_drag(a, b, width);
            assert!(0.0 <= iv.start, "{a},{b}: {iv:?}");
            assert!(iv.start <= iv.end, "{a},{b}: {iv:?}");
            assert!(iv.end <= duration, "{a},{b}: {iv:?}");
        }
    }

    #[test]
    fn drag_lands_on_whole_seconds() {
        let mut m = model(42.9);
        let iv = m.set_from_drag(37.0, 400.0, 400.0);
        assert_eq!(iv, Interval::new(3.0, 42.0));
        assert_eq!(m.interval(), iv);
    }

    #[test]
    fn drag_on_zero_width_canvas_is_ignored() {
        let mut m = model(10.0);
        assert_eq!(m.set_from_drag(5.0, 8.0, 0.0), Interval::new(0.0, 10.0));
    }

    #[test]
    fn validate_rejects_empty_and_inverted_spans() {
        let mut m = model(60.0);
        m.set_from_text("00:00:10", "00:00:10").unwrap();
        assert!(matches!(
            m.validate_for_export(),
            Err(CutError::Range(RangeError::EndNotAfterStart { .. }))
        ));
        m.set_from_text("00:00:20", "00:00:10").unwrap();
        assert!(matches!(
            m.validate_for_export(),
            Err(CutError::Range(RangeError::EndNotAfterStart { .. }))
        ));
    }

    #[test]
    fn validate_rejects_end_past_duration() {
        let mut m = model(60.0);
        m.set_from_text("00:00:10", "00:01:01").unwrap();
        assert!(matches!(
            m.validate_for_export(),
            Err(CutError::Range(RangeError::EndPastDuration { .. }))
        ));
    }

    #[test]
    fn validate_accepts_positive_span_in_bounds() {
        let mut m = model(60.0);
        m.set_from_text("00:00:00", "00:01:00").unwrap();
        assert_eq!(m.validate_for_export().unwrap(), Interval::new(0.0, 60.0));
        m.set_from_text("00:00:59", "00:01:00").unwrap();
        assert!(m.validate_for_export().is_ok());
    }

    #[test]
    fn fraction_helpers_clamp() {
        let iv = Interval::new(10.0, 20.0);
        assert_eq!(iv.at_fraction(0.5), 15.0);
        assert_eq!(iv.at_fraction(2.0), 20.0);
        assert_eq!(iv.fraction_of(5.0), 0.0);
        assert_eq!(iv.fraction_of(17.5), 0.75);
        assert_eq!(Interval::new(3.0, 3.0).fraction_of(3.0), 0.0);
    }
}
