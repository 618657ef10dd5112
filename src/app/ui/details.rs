use eframe::egui::{self, RichText, Ui, Vec2};

use semantic_canvas::layout::ItemId;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Items");
        ui.add_space(4.0);
        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("Highlight labels (fuzzy)")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);

        self.draw_item_list(ui);

        ui.separator();
        ui.heading("Selection");
        ui.add_space(6.0);
        self.draw_selection(ui);
    }

    fn draw_item_list(&mut self, ui: &mut Ui) {
        let item_count = self.store.len();
        if item_count == 0 {
            ui.label("Nothing on the canvas yet. Add a sentence below.");
            return;
        }

        let row_count = item_count.min(self.item_rows_visible);
        let matches = self.cached_search_matches();
        let mut should_load_more = false;
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .id_salt("item_list_scroll")
            .max_height(280.0)
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                if row_range.end + Self::ITEM_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some(item) = self.store.items().get(index) else {
                        continue;
                    };
                    let is_selected = self.selected == Some(item.id);
                    let mut text = RichText::new(format!("{}  {}", item.id, item.label));
                    if matches.as_ref().is_some_and(|matches| matches.contains(&item.id)) {
                        text = text.strong();
                    }

                    let response = ui.selectable_label(is_selected, text);
                    let response = match self.texts.get(&item.id) {
                        Some(full_text) => response.on_hover_text(full_text.as_str()),
                        None => response,
                    };
                    if response.clicked() {
                        clicked = Some(item.id);
                    }
                }
            });

        if let Some(id) = clicked {
            let next = if self.selected == Some(id) { None } else { Some(id) };
            self.set_selected(next);
        }

        if should_load_more && row_count < item_count {
            self.item_rows_visible = (row_count + Self::ITEM_PAGE_ROWS).min(item_count);
        }
    }

    fn draw_selection(&self, ui: &mut Ui) {
        let Some(selected) = self.selected else {
            ui.label("Click a marker or a list entry to inspect it.");
            return;
        };
        let Some(item) = self.store.get(selected) else {
            ui.label("Selected item is not in the store.");
            return;
        };

        ui.label(RichText::new(item.label.as_str()).strong());
        ui.small(format!("id {}", item.id));
        if let Some(text) = self.texts.get(&selected) {
            ui.add_space(4.0);
            ui.label(text.as_str());
        }
        ui.add_space(6.0);

        let norm = item.vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        ui.label(format!("Embedding: {} components, norm {norm:.3}", item.vector.len()));

        let Some((projection, normalized)) = self.frame_entry(selected) else {
            return;
        };
        ui.label(format!(
            "Projection: ({:.4}, {:.4})",
            projection.x, projection.y
        ));
        ui.label(format!(
            "Normalized: ({:.3}, {:.3})",
            normalized.x, normalized.y
        ));

        if let Some(marker) = self.markers.get(selected) {
            let displacement = marker.position - marker.target;
            ui.label(format!(
                "Target: ({:.1}, {:.1})  placed: ({:.1}, {:.1})",
                marker.target.x, marker.target.y, marker.position.x, marker.position.y
            ));
            ui.label(format!("Moved {:.1}px to avoid overlap", displacement.length()));
        }
    }

    /// Raw projection and unit-square coordinates of `id` in the current frame.
    fn frame_entry(&self, id: ItemId) -> Option<(Vec2, Vec2)> {
        let frame = self.frame.as_ref()?;
        let index = frame.ids.iter().position(|&frame_id| frame_id == id)?;
        Some((*frame.projection.get(index)?, *frame.normalized.get(index)?))
    }
}
