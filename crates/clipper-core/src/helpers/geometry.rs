// crates/clipper-core/src/helpers/geometry.rs
//
// Pixel <-> time mapping and fit-to-area sizing shared by the selection
// canvas and the preview viewport. Plain f32 tuples so this stays free of
// egui types; the UI converts at the call site.

/// Map a pixel offset on a canvas of `width` pixels to a time in
/// `[0, duration]`. The offset is clamped to the canvas first.
///
/// ```
/// use clipper_core::helpers::geometry::pixel_to_time;
/// assert_eq!(pixel_to_time(50.0, 200.0, 40.0), 10.0);
/// assert_eq!(pixel_to_time(-5.0, 200.0, 40.0), 0.0);
/// ```
pub fn pixel_to_time(x: f32, width: f32, duration: f64) -> f64 {
    if width <= 0.0 || duration <= 0.0 {
        return 0.0;
    }
    let ratio = (x.clamp(0.0, width) / width) as f64;
    ratio * duration
}

/// Inverse of [`pixel_to_time`]: time in seconds to an x offset on the canvas.
pub fn time_to_pixel(t: f64, width: f32, duration: f64) -> f32 {
    if width <= 0.0 || duration <= 0.0 {
        return 0.0;
    }
    ((t / duration).clamp(0.0, 1.0) as f32) * width
}

/// Placement of a scaled frame inside a display area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Scale a `src_w` x `src_h` frame to fit inside `area_w` x `area_h`,
/// preserving aspect ratio, centred. Scales up as well as down.
///
/// Returns `None` for degenerate sizes (nothing to draw).
pub fn fit_rect(src_w: u32, src_h: u32, area_w: f32, area_h: f32) -> Option<FitRect> {
    if src_w == 0 || src_h == 0 || area_w <= 0.0 || area_h <= 0.0 {
        return None;
    }
    let scale = (area_w / src_w as f32).min(area_h / src_h as f32);
    let w = src_w as f32 * scale;
    let h = src_h as f32 * scale;
    Some(FitRect {
        x: (area_w - w) / 2.0,
        y: (area_h - h) / 2.0,
        w,
        h,
    })
}
