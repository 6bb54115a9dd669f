// crates/clipper-core/src/selection.rs
//
// Selection Presenter. Keeps the three views of the interval in step:
//
//   1. the start/end text entries
//   2. the draggable overlay (two markers + translucent fill) on the canvas
//   3. the "Start: / End:" labels under the ruler
//
// Data flows one way. Every write goes into IntervalModel, then publish()
// recomputes SelectionView from the model. Views never update each other,
// so there is no path for an update to bounce back into its source.
//
// Overlay pixel positions are not stored in SelectionView. The canvas width
// changes on every window resize, so the UI asks for overlay_span(width)
// each frame and always gets positions derived from the current model.

use crate::helpers::geometry::time_to_pixel;
use crate::helpers::time::format_time;
use crate::interval::{Interval, IntervalModel};

/// Text for every view that is not pixel-based. `revision` increases on each
/// publish so text entries know when to drop the user's draft and re-sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionView {
    pub revision:    u64,
    pub start_text:  String,
    pub end_text:    String,
    pub start_label: String,
    pub end_label:   String,
}

impl SelectionView {
    /// Recompute every derived string from the model.
    pub fn publish(&mut self, model: &IntervalModel) {
        let Interval { start, end } = model.interval();
        self.revision   += 1;
        self.start_text  = format_time(start);
        self.end_text    = format_time(end);
        self.start_label = format!("Start: {}", self.start_text);
        self.end_label   = format!("End: {}", self.end_text);
    }

    /// Blank views when no file is loaded.
    pub fn clear(&mut self) {
        self.revision += 1;
        self.start_text.clear();
        self.end_text.clear();
        self.start_label.clear();
        self.end_label.clear();
    }
}

/// In-progress pointer gesture on the waveform canvas, in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub anchor:  f32,
    pub current: f32,
    pub width:   f32,
}

impl DragGesture {
    /// Pointer-down: both markers jump to the pointer.
    pub fn begin(x: f32, width: f32) -> Self {
        let x = x.clamp(0.0, width.max(0.0));
        Self { anchor: x, current: x, width }
    }

    /// Pointer-drag: stretch from the anchor to the pointer, clamped.
    pub fn update(&mut self, x: f32, width: f32) {
        self.width   = width;
        self.current = x.clamp(0.0, width.max(0.0));
    }

    /// Left and right overlay edges in pixels.
    pub fn span(&self) -> (f32, f32) {
        (self.anchor.min(self.current), self.anchor.max(self.current))
    }
}

/// Overlay edges in pixels for the model's interval on a canvas `width` wide.
pub fn overlay_span(model: &IntervalModel, width: f32) -> (f32, f32) {
    let Interval { start, end } = model.interval();
    let d = model.duration();
    let a = time_to_pixel(start, width, d);
    let b = time_to_pixel(end, width, d);
    (a.min(b), a.max(b))
}

/// Pointer-up: commit the gesture into the model and republish.
pub fn commit_drag(
    model:   &mut IntervalModel,
    view:    &mut SelectionView,
    gesture: DragGesture,
    x:       f32,
) -> Interval {
    let mut g = gesture;
    g.update(x, gesture.width);
    let interval = model.set_from_drag(g.anchor, g.current, g.width);
    view.publish(model);
    interval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::MediaFile;

    fn model() -> IntervalModel {
        IntervalModel::new(MediaFile::new("a.mp4", 80.0))
    }

    #[test]
    fn publish_derives_all_text_views() {
        let mut m = model();
        let mut v = SelectionView::default();
        m.set_from_text("0:0:5", "00:01:10.9").unwrap();
        v.publish(&m);
        assert_eq!(v.start_text, "00:00:05");
        assert_eq!(v.end_text, "00:01:10");
        assert_eq!(v.start_label, "Start: 00:00:05");
        assert_eq!(v.end_label, "End: 00:01:10");
        assert_eq!(v.revision, 1);
    }

    #[test]
    fn each_publish_bumps_revision() {
        let m = model();
        let mut v = SelectionView::default();
        v.publish(&m);
        v.publish(&m);
        assert_eq!(v.revision, 2);
        v.clear();
        assert_eq!(v.revision, 3);
        assert!(v.start_text.is_empty());
    }

    #[test]
    fn pointer_down_collapses_overlay() {
        let g = DragGesture::begin(120.0, 400.0);
        assert_eq!(g.span(), (120.0, 120.0));
    }

    #[test]
    fn drag_stretches_from_anchor_and_clamps() {
        let mut g = DragGesture::begin(120.0, 400.0);
        g.update(30.0, 400.0);
        assert_eq!(g.span(), (30.0, 120.0));
        g.update(900.0, 400.0);
        assert_eq!(g.span(), (120.0, 400.0));
        g.update(-20.0, 400.0);
        assert_eq!(g.span(), (0.0, 120.0));
    }

    #[test]
    fn release_commits_and_republishes() {
        let mut m = model();
        let mut v = SelectionView::default();
        let g = DragGesture::begin(300.0, 400.0);
        let iv = commit_drag(&mut m, &mut v, g, 100.0);
        assert_eq!(iv, Interval::new(20.0, 60.0));
        assert_eq!(m.interval(), iv);
        assert_eq!(v.start_text, "00:00:20");
        assert_eq!(v.end_text, "00:01:00");
    }

    #[test]
    fn overlay_tracks_model_across_resizes() {
        let mut m = model();
        m.set_from_text("00:00:20", "00:01:00").unwrap();
        assert_eq!(overlay_span(&m, 400.0), (100.0, 300.0));
        assert_eq!(overlay_span(&m, 800.0), (200.0, 600.0));
    }

    #[test]
    fn typed_inverted_interval_still_draws_left_to_right() {
        let mut m = model();
        m.set_from_text("00:01:00", "00:00:20").unwrap();
        assert_eq!(overlay_span(&m, 400.0), (100.0, 300.0));
    }
}
