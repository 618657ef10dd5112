use std::collections::HashMap;

use eframe::egui::{Pos2, Vec2, vec2};
use serde::{Deserialize, Serialize};

use super::engine::LayoutFrame;
use super::store::ItemId;

/// Pixel width of a label as the rendering boundary would draw it.
pub trait TextMeasure {
    fn measure_text_width(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn measure_text_width(&self, text: &str) -> f32 {
        self(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub height: f32,
    pub horizontal_padding: f32,
    pub font_size: f32,
    pub min_width: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            height: 26.0,
            horizontal_padding: 12.0,
            font_size: 13.0,
            min_width: 28.0,
        }
    }
}

/// Box size for `label`: measured width plus padding on both sides, fixed
/// height.
pub fn marker_size(label: &str, measure: &dyn TextMeasure, style: &MarkerStyle) -> Vec2 {
    let text_width = measure.measure_text_width(label);
    let text_width = if text_width.is_finite() { text_width.max(0.0) } else { 0.0 };
    vec2(
        (text_width + 2.0 * style.horizontal_padding).max(style.min_width),
        style.height,
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: ItemId,
    pub text: String,
    pub target: Pos2,
    pub position: Pos2,
    pub size: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerUpdate {
    pub id: ItemId,
    pub text: String,
    pub target: Pos2,
    pub from: Pos2,
    pub to: Pos2,
    pub size: Vec2,
}

/// Reconciliation between the markers on screen and a freshly computed frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncPlan {
    pub to_create: Vec<Marker>,
    pub to_update: Vec<MarkerUpdate>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty()
    }
}

/// Markers keyed by item id, kept in first-appearance order. Markers are never
/// removed.
#[derive(Clone, Debug, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    index_by_id: HashMap<ItemId, usize>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Marker> {
        self.index_by_id.get(&id).map(|&index| &self.markers[index])
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Builds the plan that moves this set to `frame`. Items already present are
    /// updated from their current position; unseen items are created directly
    /// at their relaxed position.
    pub fn plan_sync(&self, frame: &LayoutFrame) -> SyncPlan {
        let mut plan = SyncPlan::default();
        for (index, &id) in frame.ids.iter().enumerate() {
            let text = frame.labels[index].clone();
            let target = frame.targets[index];
            let to = frame.positions[index];
            let size = frame.sizes[index];

            match self.get(id) {
                Some(existing) => plan.to_update.push(MarkerUpdate {
                    id,
                    text,
                    target,
                    from: existing.position,
                    to,
                    size,
                }),
                None => plan.to_create.push(Marker {
                    id,
                    text,
                    target,
                    position: to,
                    size,
                }),
            }
        }
        plan
    }

    pub fn apply(&mut self, plan: SyncPlan) {
        for update in plan.to_update {
            let Some(&index) = self.index_by_id.get(&update.id) else {
                continue;
            };
            let marker = &mut self.markers[index];
            marker.text = update.text;
            marker.target = update.target;
            marker.position = update.to;
            marker.size = update.size;
        }

        for marker in plan.to_create {
            if self.index_by_id.contains_key(&marker.id) {
                continue;
            }
            self.index_by_id.insert(marker.id, self.markers.len());
            self.markers.push(marker);
        }
    }
}
