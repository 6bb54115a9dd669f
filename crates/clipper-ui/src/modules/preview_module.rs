// crates/clipper-ui/src/modules/preview_module.rs
//
// Contents of the preview window: the fitted frame, a transport row
// (play/pause, restart) and a seek bar over the previewed interval.
// app.rs hosts it in its own viewport and hands over the latest texture in
// `current_frame` before calling ui().
use super::EditorModule;
use crate::theme::{ACCENT, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM, TRACK_BG, TRACK_FG};
use clipper_core::commands::EditorCommand;
use clipper_core::helpers::geometry::fit_rect;
use clipper_core::helpers::time::format_time;
use clipper_core::state::AppState;
use egui::{Color32, Rect, RichText, Sense, Stroke, Ui, pos2, vec2};

// ── Transport layout ─────────────────────────────────────────────────────────
const BAR_H:    f32 = 40.0;
const BTN_SIZE: f32 = 28.0;
const SEEK_H:   f32 = 10.0;

#[derive(Default)]
pub struct PreviewModule {
    /// Newest decoded frame for the open session, set by app.rs each frame.
    pub current_frame: Option<egui::TextureHandle>,
}

impl PreviewModule {
    fn transport_button(ui: &mut Ui, icon: &str, hint: &str) -> bool {
        let btn = egui::Button::new(RichText::new(icon).size(13.0))
            .stroke(Stroke::new(1.0, DARK_BORDER))
            .fill(DARK_BG_3)
            .min_size(vec2(BTN_SIZE, BTN_SIZE));
        ui.add(btn).on_hover_text(hint).clicked()
    }
}

impl EditorModule for PreviewModule {
    fn name(&self) -> &str { "Preview" }

    fn ui(&mut self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        let Some(view) = &state.preview else { return };

        // ── Frame ─────────────────────────────────────────────────────────
        let area = vec2(ui.available_width(), (ui.available_height() - BAR_H - SEEK_H - 12.0).max(60.0));
        let (rect, _) = ui.allocate_exact_size(area, Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::BLACK);

        match &self.current_frame {
            Some(tex) => {
                let [w, h] = tex.size();
                if let Some(fit) = fit_rect(w as u32, h as u32, rect.width(), rect.height()) {
                    let dest = Rect::from_min_size(
                        pos2(rect.min.x + fit.x, rect.min.y + fit.y),
                        vec2(fit.w, fit.h),
                    );
                    painter.image(
                        tex.id(),
                        dest,
                        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
            }
            None => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Loading…",
                    egui::FontId::proportional(14.0),
                    DARK_TEXT_DIM,
                );
            }
        }

        ui.add_space(6.0);

        // ── Seek bar ──────────────────────────────────────────────────────
        let (bar, resp) = ui.allocate_exact_size(
            vec2(ui.available_width(), SEEK_H),
            Sense::click_and_drag(),
        );
        let p = ui.painter();
        p.rect_filled(bar, 4.0, TRACK_BG);
        let progress = view.progress();
        if progress > 0.0 {
            let mut fill = bar;
            fill.max.x = bar.min.x + bar.width() * progress;
            p.rect_filled(fill, 4.0, TRACK_FG);
        }
        let head_x = bar.min.x + bar.width() * progress;
        p.circle_filled(pos2(head_x, bar.center().y), SEEK_H * 0.6, ACCENT);

        if resp.clicked() || resp.dragged() {
            if let Some(pos) = resp.interact_pointer_pos() {
                let fraction = ((pos.x - bar.min.x) / bar.width().max(1.0)).clamp(0.0, 1.0);
                cmd.push(EditorCommand::SeekPreview(fraction));
            }
        }
        if resp.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        ui.add_space(6.0);

        // ── Transport ─────────────────────────────────────────────────────
        ui.horizontal(|ui| {
            let (icon, hint) = if view.playing { ("⏸", "Pause") } else { ("▶", "Play") };
            if Self::transport_button(ui, icon, hint) {
                cmd.push(EditorCommand::TogglePreviewPlay);
            }
            if Self::transport_button(ui, "⟲", "Restart from the start of the selection") {
                cmd.push(EditorCommand::RestartPreview);
            }

            ui.add_space(10.0);
            ui.label(
                RichText::new(format!(
                    "{}  /  {}",
                    format_time(view.playhead),
                    format_time(view.interval.end),
                ))
                .monospace()
                .size(12.0),
            );

            if let Some((w, h)) = view.frame_size {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(format!("{w}×{h}")).size(10.0).color(DARK_TEXT_DIM));
                });
            }
        });
    }
}
