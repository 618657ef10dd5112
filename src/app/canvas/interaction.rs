use eframe::egui::{self, Rect, Ui};

use semantic_canvas::layout::ItemId;

use super::super::ViewModel;

impl ViewModel {
    /// Screen rect of a marker centred at canvas-local `center`.
    pub(in crate::app) fn marker_rect(canvas_rect: Rect, center: egui::Pos2, size: egui::Vec2) -> Rect {
        Rect::from_center_size(canvas_rect.min + center.to_vec2(), size)
    }

    /// Topmost marker under the pointer. Later markers are drawn on top, so
    /// they win.
    pub(in crate::app) fn hovered_marker(&self, ui: &Ui, canvas_rect: Rect, now: f64) -> Option<ItemId> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !canvas_rect.contains(pointer) {
            return None;
        }

        self.markers
            .iter()
            .rev()
            .find(|marker| {
                let center = self.displayed_position(marker.id, marker.position, now);
                Self::marker_rect(canvas_rect, center, marker.size).contains(pointer)
            })
            .map(|marker| marker.id)
    }

    pub(in crate::app) fn handle_canvas_click(
        &mut self,
        response: &egui::Response,
        hovered: Option<ItemId>,
    ) {
        if response.clicked_by(egui::PointerButton::Primary) {
            self.set_selected(hovered);
        }
    }
}
