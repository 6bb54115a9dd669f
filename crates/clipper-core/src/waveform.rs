// crates/clipper-core/src/waveform.rs
//
// Decorative waveform for the selection canvas. It is a zig-zag generated
// from the canvas geometry alone; no audio is read. Regenerated on every
// layout so it always spans the current canvas width.

const PEAKS: usize = 100;
/// Peak height as a fraction of the canvas height.
const PEAK_SCALE: f32 = 0.4;

/// Polyline points (x, y) in canvas-local pixels, alternating above and
/// below the centre line. Empty when the canvas is not laid out yet or no
/// media is loaded.
pub fn simulated_waveform(width: f32, height: f32, duration: f64) -> Vec<(f32, f32)> {
    if width <= 1.0 || height <= 1.0 || duration <= 0.0 {
        return Vec::new();
    }

    let peak_h = height * PEAK_SCALE;
    let mid_y  = height / 2.0;
    let dx     = width / (PEAKS - 1) as f32;

    let mut points = Vec::with_capacity(PEAKS * 2);
    for i in 0..PEAKS {
        let x   = i as f32 * dx;
        let amp = peak_h * amplitude(i);
        points.push((x, mid_y - amp));
        points.push((x, mid_y + amp));
    }
    points
}

/// Alternating tall/short peaks, swelling towards both ends of the canvas.
fn amplitude(i: usize) -> f32 {
    let alternate = 1.0 + ((i % 2) as f32 - 0.5) * 0.5;
    let envelope  = 0.5 + 0.5 * (0.5 - i as f32 / PEAKS as f32).abs();
    alternate * envelope
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_full_width_and_stays_inside_canvas() {
        let pts = simulated_waveform(500.0, 80.0, 12.0);
        assert_eq!(pts.len(), PEAKS * 2);
        assert_eq!(pts.first().unwrap().0, 0.0);
        assert!((pts.last().unwrap().0 - 500.0).abs() < 1e-3);
        assert!(pts.iter().all(|&(_, y)| (0.0..=80.0).contains(&y)));
    }

    #[test]
    fn points_alternate_around_centre() {
        let pts = simulated_waveform(200.0, 100.0, 5.0);
        for pair in pts.chunks(2) {
            assert!(pair[0].1 < 50.0);
            assert!(pair[1].1 > 50.0);
            assert_eq!(pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn empty_for_unlaid_canvas_or_missing_media() {
        assert!(simulated_waveform(1.0, 80.0, 10.0).is_empty());
        assert!(simulated_waveform(300.0, 80.0, 0.0).is_empty());
    }
}
