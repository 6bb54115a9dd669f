// crates/clipper-ui/src/theme.rs
//
// Palette and egui style for both viewports. Slate backgrounds with a single
// amber accent; the accent is reserved for things the user can grab or act on
// (markers, the Cut button, hovered widgets).

use egui::style::{Selection, WidgetVisuals};
use egui::{Color32, Context, CornerRadius, Stroke, Style, Theme, ThemePreference, Visuals};

// ── Palette ──────────────────────────────────────────────────────────────────
pub const ACCENT:        Color32 = Color32::from_rgb(240, 168,  48);
pub const ACCENT_DIM:    Color32 = Color32::from_rgb(150,  98,  24);
pub const ACCENT_HOVER:  Color32 = Color32::from_rgb(252, 198, 110);

pub const DARK_BG_0:     Color32 = Color32::from_rgb( 16,  18,  22);
pub const DARK_BG_1:     Color32 = Color32::from_rgb( 23,  26,  31);
pub const DARK_BG_2:     Color32 = Color32::from_rgb( 31,  35,  42);
pub const DARK_BG_3:     Color32 = Color32::from_rgb( 42,  47,  56);
pub const DARK_BG_4:     Color32 = Color32::from_rgb( 55,  61,  72);

pub const DARK_TEXT:     Color32 = Color32::from_rgb(214, 218, 226);
pub const DARK_TEXT_DIM: Color32 = Color32::from_rgb(128, 136, 150);
pub const DARK_BORDER:   Color32 = Color32::from_rgb( 60,  66,  78);

// ── Selection canvas ─────────────────────────────────────────────────────────
pub const WAVEFORM:      Color32 = Color32::from_rgb( 70, 118, 160);
pub const CENTRE_LINE:   Color32 = Color32::from_rgb( 66,  72,  86);
pub const OVERLAY_FILL:  Color32 = Color32::from_rgba_premultiplied(56, 38, 10, 84);
pub const MARKER:        Color32 = ACCENT;

// ── Status ───────────────────────────────────────────────────────────────────
pub const GREEN_DIM:     Color32 = Color32::from_rgb( 96, 186, 122);
pub const RED_DIM:       Color32 = Color32::from_rgb(210,  92,  86);
pub const TRACK_BG:      Color32 = Color32::from_rgb( 36,  40,  48);
pub const TRACK_FG:      Color32 = Color32::from_rgb( 98, 164, 236);

const RADIUS: CornerRadius = CornerRadius::same(3);

/// One widget state: fill, outline colour, text/icon colour and its weight.
fn widget(base: WidgetVisuals, fill: Color32, outline: Color32, text: Color32, weight: f32) -> WidgetVisuals {
    WidgetVisuals {
        bg_fill:       fill,
        weak_bg_fill:  fill,
        bg_stroke:     Stroke::new(1.0, outline),
        fg_stroke:     Stroke::new(weight, text),
        corner_radius: RADIUS,
        ..base
    }
}

fn clipper_visuals() -> Visuals {
    let mut v = Visuals::dark();
    v.panel_fill       = DARK_BG_1;
    v.window_fill      = DARK_BG_2;
    v.faint_bg_color   = DARK_BG_2;
    v.extreme_bg_color = DARK_BG_0;
    v.window_stroke    = Stroke::new(1.0, DARK_BORDER);
    v.window_corner_radius = RADIUS;
    v.menu_corner_radius   = RADIUS;

    // Text-entry selection: readable black text on the dim accent.
    v.selection = Selection { bg_fill: ACCENT_DIM, stroke: Stroke::new(1.0, Color32::BLACK) };
    v.hyperlink_color     = ACCENT_HOVER;
    v.override_text_color = Some(DARK_TEXT);

    let w = &mut v.widgets;
    w.noninteractive = widget(w.noninteractive, DARK_BG_2, DARK_BORDER, DARK_TEXT_DIM, 1.0);
    w.inactive       = widget(w.inactive,       DARK_BG_3, DARK_BORDER, DARK_TEXT,     1.0);
    w.hovered        = widget(w.hovered,        DARK_BG_4, ACCENT_DIM,  ACCENT_HOVER,  1.5);
    w.active         = widget(w.active,         ACCENT_DIM, ACCENT,     Color32::WHITE, 2.0);
    w.open           = w.hovered;
    v
}

/// Install the palette. The app is always dark, whatever the OS prefers.
pub fn configure_style(ctx: &Context) {
    let mut style = Style { visuals: clipper_visuals(), ..Style::default() };

    // One compact window: tighter rows than egui's defaults, roomier buttons.
    style.spacing.item_spacing   = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 4.0);
    style.spacing.window_margin  = egui::Margin::same(8);
    style.spacing.interact_size.y = 22.0;

    ctx.set_theme(ThemePreference::Dark);
    ctx.set_style_of(Theme::Dark, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_applies_palette_and_pins_dark() {
        let ctx = Context::default();
        configure_style(&ctx);

        assert_eq!(ctx.theme(), Theme::Dark);
        let style = ctx.style();
        assert_eq!(style.visuals.panel_fill, DARK_BG_1);
        assert_eq!(style.visuals.selection.bg_fill, ACCENT_DIM);
        assert_eq!(style.visuals.override_text_color, Some(DARK_TEXT));
        assert_eq!(style.visuals.widgets.hovered.bg_stroke.color, ACCENT_DIM);
        assert_eq!(style.visuals.widgets.open, style.visuals.widgets.hovered);
        assert_eq!(style.spacing.item_spacing, egui::vec2(8.0, 6.0));
    }
}
