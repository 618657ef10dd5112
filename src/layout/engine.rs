use std::time::Instant;

use eframe::egui::{Pos2, Vec2};
use log::debug;

use crate::config::LayoutConfig;
use crate::error::LayoutError;

use super::normalize::{drawable_rect, normalize, to_screen};
use super::reduce::{PcaReducer, Reducer};
use super::resolve::OverlapResolver;
use super::store::{ItemId, VectorStore};
use super::sync::{MarkerStyle, TextMeasure, marker_size};

/// Drawable area in pixels, read from the rendering boundary for every
/// recomputation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Output of one full pass over the store. Every vector is indexed like the
/// store at the time of computation.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutFrame {
    pub canvas: Canvas,
    pub ids: Vec<ItemId>,
    pub labels: Vec<String>,
    pub projection: Vec<Vec2>,
    pub normalized: Vec<Vec2>,
    pub targets: Vec<Pos2>,
    pub sizes: Vec<Vec2>,
    pub positions: Vec<Pos2>,
}

impl LayoutFrame {
    pub fn empty(canvas: Canvas) -> Self {
        Self {
            canvas,
            ids: Vec::new(),
            labels: Vec::new(),
            projection: Vec::new(),
            normalized: Vec::new(),
            targets: Vec::new(),
            sizes: Vec::new(),
            positions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Result of a successful insertion: the new committed store, the id it
/// assigned, and the layout of the whole store after the append.
#[derive(Clone, Debug)]
pub struct Committed {
    pub store: VectorStore,
    pub id: ItemId,
    pub frame: LayoutFrame,
}

/// Store → projection → unit square → pixels → relaxed marker positions.
pub struct LayoutEngine {
    reducer: Box<dyn Reducer>,
    resolver: OverlapResolver,
    padding: f32,
    marker: MarkerStyle,
}

impl LayoutEngine {
    pub fn new(config: &LayoutConfig, marker: MarkerStyle) -> Self {
        Self::with_reducer(config, marker, Box::new(PcaReducer::default()))
    }

    pub fn with_reducer(config: &LayoutConfig, marker: MarkerStyle, reducer: Box<dyn Reducer>) -> Self {
        Self {
            reducer,
            resolver: config.resolver(),
            padding: config.padding,
            marker,
        }
    }

    pub fn reducer_name(&self) -> &'static str {
        self.reducer.name()
    }

    pub fn marker_style(&self) -> &MarkerStyle {
        &self.marker
    }

    /// Lays out the whole store for `canvas`. Pure: the same store, canvas and
    /// measurements always give the same frame.
    pub fn compute(
        &self,
        store: &VectorStore,
        canvas: Canvas,
        measure: &dyn TextMeasure,
    ) -> Result<LayoutFrame, LayoutError> {
        if store.is_empty() {
            return Ok(LayoutFrame::empty(canvas));
        }

        let started = Instant::now();
        let vectors = store.vectors_in_order();
        let projection = self.reducer.project(&vectors)?;
        let normalized = normalize(&projection);
        let targets = to_screen(&normalized, canvas.width, canvas.height, self.padding);

        let labels = store.labels().map(str::to_owned).collect::<Vec<_>>();
        let sizes = labels
            .iter()
            .map(|label| marker_size(label, measure, &self.marker))
            .collect::<Vec<_>>();
        let bounds = drawable_rect(canvas.width, canvas.height, self.padding);
        let positions = self.resolver.resolve(&targets, &sizes, bounds);

        debug!(
            "layout recomputed: items={} reducer={} canvas={}x{} took={:?}",
            store.len(),
            self.reducer.name(),
            canvas.width,
            canvas.height,
            started.elapsed()
        );

        Ok(LayoutFrame {
            canvas,
            ids: store.items().iter().map(|item| item.id).collect(),
            labels,
            projection,
            normalized,
            targets,
            sizes,
            positions,
        })
    }

    /// Appends to a snapshot of `store` and lays out the result. `store` itself
    /// is never modified, so any error leaves the committed state intact.
    pub fn insert(
        &self,
        store: &VectorStore,
        label: impl Into<String>,
        vector: Vec<f32>,
        canvas: Canvas,
        measure: &dyn TextMeasure,
    ) -> Result<Committed, LayoutError> {
        let mut next = store.clone();
        let id = next.append(label, vector)?;
        let frame = self.compute(&next, canvas, measure)?;
        Ok(Committed {
            store: next,
            id,
            frame,
        })
    }
}
