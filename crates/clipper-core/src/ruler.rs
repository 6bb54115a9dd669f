// crates/clipper-core/src/ruler.rs
//
// Time ruler above the waveform canvas.
//
// Tick spacing comes from a fixed table keyed by the media duration, not by
// canvas width, so the same file always gets the same marks:
//
// | Duration      | Major step |
// |---------------|------------|
// | < 30 s        | 5 s        |
// | < 2 min       | 10 s       |
// | < 10 min      | 30 s       |
// | otherwise     | 60 s       |
//
// Steps above 10 s also get an unlabeled minor tick halfway between majors.
// On long media squeezed into a narrow canvas the majors crowd together;
// every major keeps its line, but a label is dropped when it would start
// within MIN_LABEL_GAP_PX of the last label drawn.

use crate::helpers::geometry::time_to_pixel;
use crate::helpers::time::format_time;

/// Room one `hh:mm:ss` label needs at the ruler's font size, plus padding.
pub const MIN_LABEL_GAP_PX: f32 = 48.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Major,
    Minor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    pub x:       f32,
    pub seconds: u64,
    pub kind:    TickKind,
    /// `hh:mm:ss` for major ticks, `None` for minor ones.
    pub label:   Option<String>,
}

/// Major tick step in whole seconds for a file of `duration` seconds.
pub fn major_step(duration: f64) -> u64 {
    if duration < 30.0 {
        5
    } else if duration < 120.0 {
        10
    } else if duration < 600.0 {
        30
    } else {
        60
    }
}

/// All ticks for a ruler `width` pixels wide, in ascending time order.
/// Empty when there is nothing to measure.
pub fn ruler_ticks(duration: f64, width: f32) -> Vec<RulerTick> {
    if duration <= 0.0 || width <= 1.0 {
        return Vec::new();
    }

    let step = major_step(duration);
    let last = duration as u64;
    let mut ticks = Vec::new();
    let mut last_label_x: Option<f32> = None;

    for sec in (0..=last).step_by(step as usize) {
        let x = time_to_pixel(sec as f64, width, duration);
        let fits = last_label_x.map_or(true, |prev| x - prev >= MIN_LABEL_GAP_PX);
        if fits {
            last_label_x = Some(x);
        }
        ticks.push(RulerTick {
            x,
            seconds: sec,
            kind:    TickKind::Major,
            label:   fits.then(|| format_time(sec as f64)),
        });
    }

    if step > 10 {
        let half = step / 2;
        for sec in (half..=last).step_by(step as usize) {
            ticks.push(RulerTick {
                x:       time_to_pixel(sec as f64, width, duration),
                seconds: sec,
                kind:    TickKind::Minor,
                label:   None,
            });
        }
        ticks.sort_by_key(|t| t.seconds);
    }

    ticks
}
