use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, StrokeKind, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use semantic_canvas::layout::{Canvas, ItemId};

use super::super::render_utils::{
    MarkerTone, SELECTED_GOLD, draw_background, ease_out, position_color, with_alpha,
};
use super::super::{SearchMatchCache, ViewModel};

const MARKER_ROUNDING: f32 = 6.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Ids whose label fuzzily matches the search box, recomputed only when
    /// the query or the item count changes.
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<ItemId>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.item_count == self.store.len()
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .store
            .items()
            .iter()
            .filter(|item| {
                fuzzy_match_score(&matcher, &item.label, query).is_some()
                    || self
                        .texts
                        .get(&item.id)
                        .is_some_and(|text| fuzzy_match_score(&matcher, text, query).is_some())
            })
            .map(|item| item.id)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            item_count: self.store.len(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        let now = ui.input(|input| input.time);
        let canvas = Canvas::new(rect.width(), rect.height());

        let style = *self.engine.marker_style();
        let font = FontId::proportional(style.font_size);
        let measure = {
            let painter = painter.clone();
            let font = font.clone();
            move |text: &str| -> f32 {
                painter
                    .layout_no_wrap(text.to_owned(), font.clone(), Color32::WHITE)
                    .size()
                    .x
            }
        };

        self.drain_outcomes(canvas, &measure, now);
        self.refresh_for_canvas(canvas, &measure, now);

        draw_background(&painter, rect, self.config.layout.padding);

        if self.markers.is_empty() {
            let message = if self.queue.in_flight() > 0 {
                "Embedding..."
            } else {
                "Add a sentence below to place it on the canvas."
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(15.0),
                Color32::from_gray(170),
            );
            return;
        }

        let hovered = self.hovered_marker(ui, rect, now);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        self.handle_canvas_click(&response, hovered);

        let matches = self.cached_search_matches();
        let search_active = matches.as_ref().is_some_and(|matches| !matches.is_empty());

        if let Some(selected) = self.selected
            && let Some(marker) = self.markers.get(selected)
        {
            let target = rect.min + marker.target.to_vec2();
            let placed =
                rect.min + self.displayed_position(selected, marker.position, now).to_vec2();
            let guide = with_alpha(SELECTED_GOLD, 0.6);
            painter.line_segment([target, placed], Stroke::new(1.2, guide));
            painter.circle_filled(target, 3.0, guide);
        }

        let normalized = self
            .frame
            .as_ref()
            .map(|frame| frame.normalized.as_slice())
            .unwrap_or_default();

        for (index, marker) in self.markers.iter().enumerate() {
            let center = self.displayed_position(marker.id, marker.position, now);
            let marker_rect = Self::marker_rect(rect, center, marker.size);
            if !rect.intersects(marker_rect) {
                continue;
            }

            let fade = self
                .appeared_at
                .get(&marker.id)
                .map(|&started_at| ease_out(self.transition_progress(started_at, now)))
                .unwrap_or(1.0);

            let is_selected = self.selected == Some(marker.id);
            let is_hovered = hovered == Some(marker.id);
            let is_match = matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&marker.id));

            let base_color = normalized
                .get(index)
                .map(|point| position_color(point.x, point.y))
                .unwrap_or(Color32::from_rgb(120, 160, 200));
            let fill =
                MarkerTone::of(is_selected, is_hovered, is_match, search_active).fill(base_color);

            painter.rect_filled(marker_rect, MARKER_ROUNDING, with_alpha(fill, fade));
            let stroke_width = if is_selected || is_match { 1.8 } else { 1.0 };
            painter.rect_stroke(
                marker_rect,
                MARKER_ROUNDING,
                Stroke::new(
                    stroke_width,
                    with_alpha(Color32::from_rgba_unmultiplied(15, 15, 15, 190), fade),
                ),
                StrokeKind::Inside,
            );
            painter.text(
                marker_rect.center(),
                Align2::CENTER_CENTER,
                marker.text.as_str(),
                font.clone(),
                with_alpha(Color32::from_gray(18), fade),
            );
        }

        if let Some(id) = hovered
            && let Some(text) = self.texts.get(&id)
        {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{id}  {text}"),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if self.prune_transitions(now) {
            ui.ctx().request_repaint();
        }
    }
}
