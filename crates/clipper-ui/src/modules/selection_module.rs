// crates/clipper-ui/src/modules/selection_module.rs
//
// The selection panel: time ruler, waveform canvas with the drag overlay,
// Start/End labels and the two hh:mm:ss entries.
//
// Pointer handling emits DragBegin/DragMove/DragEnd with canvas-local x and
// the canvas width of the current frame, so a window resize between press
// and release still maps onto the right timestamps. Only DragEnd writes the
// model; until then the overlay follows AppState::drag.
//
// The entries keep their own buffers. They resync whenever
// SelectionView::revision moves, which throws away an unsent draft: a drag
// or a successful commit always wins over half-typed text.

use super::EditorModule;
use crate::theme::{
    ACCENT_HOVER, CENTRE_LINE, DARK_BG_0, DARK_BORDER, DARK_TEXT_DIM, MARKER, OVERLAY_FILL, WAVEFORM,
};
use clipper_core::commands::EditorCommand;
use clipper_core::ruler::{ruler_ticks, TickKind};
use clipper_core::state::AppState;
use clipper_core::waveform::simulated_waveform;
use egui::{Pos2, Rect, RichText, Sense, Stroke, Ui, pos2, vec2};

const RULER_H:  f32 = 22.0;
const CANVAS_H: f32 = 120.0;
const ENTRY_W:  f32 = 84.0;

#[derive(Default)]
pub struct SelectionModule {
    start_buf:     String,
    end_buf:       String,
    seen_revision: Option<u64>,
    /// Buffers differ from the last published text.
    dirty:         bool,
    /// Last canvas-local x seen during a drag, for releases that report no position.
    last_x:        f32,
}

impl SelectionModule {
    fn sync_entries(&mut self, state: &AppState) {
        if self.seen_revision != Some(state.selection.revision) {
            self.start_buf     = state.selection.start_text.clone();
            self.end_buf       = state.selection.end_text.clone();
            self.seen_revision = Some(state.selection.revision);
            self.dirty         = false;
        }
    }

    fn draw_ruler(&self, ui: &mut Ui, duration: Option<f64>) {
        let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), RULER_H), Sense::hover());
        let p = ui.painter_at(rect);
        p.rect_filled(rect, 0.0, DARK_BG_0);

        let Some(duration) = duration else { return };
        for tick in ruler_ticks(duration, rect.width()) {
            let x = rect.min.x + tick.x;
            let (len, color) = match tick.kind {
                TickKind::Major => (8.0, DARK_TEXT_DIM),
                TickKind::Minor => (4.0, DARK_BORDER),
            };
            p.line_segment(
                [pos2(x, rect.max.y - len), pos2(x, rect.max.y)],
                Stroke::new(1.0, color),
            );
            if let Some(label) = &tick.label {
                // Keep the last label inside the strip.
                let anchor = if tick.x > rect.width() - 40.0 {
                    egui::Align2::RIGHT_TOP
                } else {
                    egui::Align2::LEFT_TOP
                };
                p.text(
                    pos2(x + 2.0, rect.min.y + 1.0),
                    anchor,
                    label,
                    egui::FontId::monospace(9.0),
                    DARK_TEXT_DIM,
                );
            }
        }
    }

    fn draw_canvas(&mut self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        let (rect, resp) = ui.allocate_exact_size(
            vec2(ui.available_width(), CANVAS_H),
            Sense::click_and_drag(),
        );
        let width = rect.width();
        let p = ui.painter_at(rect);
        p.rect_filled(rect, 2.0, DARK_BG_0);
        p.rect_stroke(rect, 2.0, Stroke::new(1.0, DARK_BORDER), egui::StrokeKind::Inside);

        let mid_y = rect.center().y;
        p.line_segment(
            [pos2(rect.min.x, mid_y), pos2(rect.max.x, mid_y)],
            Stroke::new(1.0, CENTRE_LINE),
        );

        let Some(duration) = state.duration() else {
            p.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No media loaded",
                egui::FontId::proportional(12.0),
                DARK_TEXT_DIM,
            );
            return;
        };

        let points: Vec<Pos2> = simulated_waveform(width, rect.height(), duration)
            .into_iter()
            .map(|(x, y)| pos2(rect.min.x + x, rect.min.y + y))
            .collect();
        if points.len() > 1 {
            p.add(egui::Shape::line(points, Stroke::new(1.0, WAVEFORM)));
        }

        if let Some((a, b)) = state.overlay(width) {
            let span = Rect::from_min_max(
                pos2(rect.min.x + a, rect.min.y),
                pos2(rect.min.x + b, rect.max.y),
            );
            p.rect_filled(span, 0.0, OVERLAY_FILL);
            for x in [span.min.x, span.max.x] {
                p.line_segment(
                    [pos2(x, rect.min.y), pos2(x, rect.max.y)],
                    Stroke::new(2.0, MARKER),
                );
            }
        }

        if resp.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        let local = |pos: Pos2| pos.x - rect.min.x;

        if resp.drag_started() {
            let origin = ui.input(|i| i.pointer.press_origin())
                .or_else(|| resp.interact_pointer_pos());
            if let Some(pos) = origin {
                self.last_x = local(pos);
                cmd.push(EditorCommand::DragBegin { x: self.last_x, width });
            }
        }
        if resp.dragged() {
            if let Some(pos) = resp.interact_pointer_pos() {
                self.last_x = local(pos);
                cmd.push(EditorCommand::DragMove { x: self.last_x, width });
            }
        }
        if resp.drag_stopped() {
            if let Some(pos) = resp.interact_pointer_pos() {
                self.last_x = local(pos);
            }
            cmd.push(EditorCommand::DragEnd { x: self.last_x, width });
        }
        if resp.clicked() {
            // A click is a zero-length drag: both edges land on the same spot.
            if let Some(pos) = resp.interact_pointer_pos() {
                let x = local(pos);
                cmd.push(EditorCommand::DragBegin { x, width });
                cmd.push(EditorCommand::DragEnd   { x, width });
            }
        }
    }

    fn draw_entries(&mut self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        let loaded = state.model.is_some();

        ui.horizontal(|ui| {
            ui.label(RichText::new(&state.selection.start_label).size(12.0).color(MARKER));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(&state.selection.end_label).size(12.0).color(MARKER));
            });
        });

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            let mut changed     = false;
            let mut focus_lost  = false;

            ui.label(RichText::new("Start").size(11.0).color(DARK_TEXT_DIM));
            let start = ui.add_enabled(
                loaded,
                egui::TextEdit::singleline(&mut self.start_buf)
                    .hint_text("00:00:00")
                    .desired_width(ENTRY_W)
                    .font(egui::TextStyle::Monospace),
            );
            changed    |= start.changed();
            focus_lost |= start.lost_focus();

            ui.add_space(12.0);

            ui.label(RichText::new("End").size(11.0).color(DARK_TEXT_DIM));
            let end = ui.add_enabled(
                loaded,
                egui::TextEdit::singleline(&mut self.end_buf)
                    .hint_text("00:00:00")
                    .desired_width(ENTRY_W)
                    .font(egui::TextStyle::Monospace),
            );
            changed    |= end.changed();
            focus_lost |= end.lost_focus();

            if changed {
                self.dirty = true;
                cmd.push(EditorCommand::EditTimeText {
                    start: self.start_buf.clone(),
                    end:   self.end_buf.clone(),
                });
            }
            if focus_lost && self.dirty {
                self.dirty = false;
                cmd.push(EditorCommand::CommitTimeText {
                    start: self.start_buf.clone(),
                    end:   self.end_buf.clone(),
                });
            }

            if self.dirty {
                ui.label(RichText::new("●").size(10.0).color(ACCENT_HOVER))
                    .on_hover_text("Press Enter to apply");
            }
        });
    }
}

impl EditorModule for SelectionModule {
    fn name(&self) -> &str { "Selection" }

    fn ui(&mut self, ui: &mut Ui, state: &AppState, cmd: &mut Vec<EditorCommand>) {
        self.sync_entries(state);

        ui.spacing_mut().item_spacing.y = 0.0;
        self.draw_ruler(ui, state.duration());
        self.draw_canvas(ui, state, cmd);
        ui.spacing_mut().item_spacing.y = 5.0;

        ui.add_space(6.0);
        self.draw_entries(ui, state, cmd);
    }
}
