// crates/clipper-ui/src/helpers/format.rs
//
// Display-only string shaping. Anything involving seconds belongs in
// clipper_core::helpers::time instead.

use std::path::Path;

/// Average glyph width at the 11-12 px body sizes the panels use. Close
/// enough for trimming without borrowing `&mut Fonts` to measure.
const AVG_CHAR_PX: f32 = 6.5;

/// Shorten a path to roughly `max_px` by trimming from the left, so the file
/// name at the end stays visible: `…/videos/holiday.mp4`.
pub fn fit_path(path: &Path, max_px: f32) -> String {
    let text = path.display().to_string();
    let max_chars = (max_px / AVG_CHAR_PX).max(0.0) as usize;
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text;
    }
    if max_chars == 0 {
        return String::new();
    }
    let skip = char_count - (max_chars - 1);
    format!("…{}", text.chars().skip(skip).collect::<String>())
}
