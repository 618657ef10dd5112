use eframe::egui::Pos2;
use log::{error, info, warn};

use semantic_canvas::error::LayoutError;
use semantic_canvas::layout::{Canvas, ItemId, LayoutFrame, TextMeasure};
use semantic_canvas::worker::InsertOutcome;

use super::super::render_utils::ease_out;
use super::super::{Transition, ViewModel};

/// Sub-pixel rect jitter should not trigger a relayout.
const RESIZE_TOLERANCE: f32 = 0.5;

fn same_canvas(a: Canvas, b: Canvas) -> bool {
    (a.width - b.width).abs() <= RESIZE_TOLERANCE && (a.height - b.height).abs() <= RESIZE_TOLERANCE
}

impl ViewModel {
    /// Commits every finished insertion, oldest submission first.
    pub(in crate::app) fn drain_outcomes(
        &mut self,
        canvas: Canvas,
        measure: &dyn TextMeasure,
        now: f64,
    ) {
        loop {
            match self.queue.poll() {
                Ok(Some(outcome)) => self.commit(outcome, canvas, measure, now),
                Ok(None) => break,
                Err(err) => {
                    let message = format!("Embedding worker stopped: {err}");
                    if self.last_error.as_deref() != Some(message.as_str()) {
                        error!("insert queue unavailable: {err}");
                        self.last_error = Some(message);
                    }
                    break;
                }
            }
        }
    }

    fn commit(&mut self, outcome: InsertOutcome, canvas: Canvas, measure: &dyn TextMeasure, now: f64) {
        let prepared = match outcome.result {
            Ok(prepared) => prepared,
            Err(err) => {
                warn!("insert {:?} dropped: {err}", outcome.ticket);
                self.last_error = Some(format!("Could not add text: {err}"));
                return;
            }
        };

        match self
            .engine
            .insert(&self.store, prepared.label, prepared.vector, canvas, measure)
        {
            Ok(committed) => {
                info!(
                    "item committed: id={} ticket={:?} items={}",
                    committed.id,
                    outcome.ticket,
                    committed.store.len()
                );
                self.store = committed.store;
                self.texts.insert(committed.id, prepared.text);
                self.apply_frame(committed.frame, now);
            }
            Err(err) => {
                if err == LayoutError::InsufficientData {
                    error!("layout produced no data for a non-empty store");
                    debug_assert!(false, "reducer reported insufficient data after an append");
                } else {
                    warn!("insert {:?} rejected: {err}", outcome.ticket);
                }
                self.last_error = Some(format!("Could not place text: {err}"));
            }
        }
    }

    /// Recomputes the layout when the canvas size changed since the last frame.
    pub(in crate::app) fn refresh_for_canvas(
        &mut self,
        canvas: Canvas,
        measure: &dyn TextMeasure,
        now: f64,
    ) {
        if self.store.is_empty() {
            return;
        }
        let stale = self.frame.as_ref().is_none_or(|frame| {
            frame.len() != self.store.len() || !same_canvas(frame.canvas, canvas)
        });
        if !stale {
            return;
        }

        match self.engine.compute(&self.store, canvas, measure) {
            Ok(frame) => self.apply_frame(frame, now),
            Err(err) => {
                error!("layout recompute failed: {err}");
                self.last_error = Some(format!("Layout failed: {err}"));
            }
        }
    }

    /// Syncs markers to `frame`, starting a transition for every marker that
    /// moves. A marker caught mid-transition restarts from where it is drawn.
    pub(in crate::app) fn apply_frame(&mut self, frame: LayoutFrame, now: f64) {
        let plan = self.markers.plan_sync(&frame);

        for update in &plan.to_update {
            if update.from == update.to {
                continue;
            }
            let from = self.displayed_position(update.id, update.from, now);
            self.transitions.insert(
                update.id,
                Transition {
                    from,
                    to: update.to,
                    started_at: now,
                },
            );
        }
        for marker in &plan.to_create {
            self.appeared_at.insert(marker.id, now);
        }

        self.markers.apply(plan);
        self.frame = Some(frame);
    }

    pub(in crate::app) fn displayed_position(&self, id: ItemId, resting: Pos2, now: f64) -> Pos2 {
        let Some(transition) = self.transitions.get(&id) else {
            return resting;
        };
        transition
            .from
            .lerp(transition.to, ease_out(self.transition_progress(transition.started_at, now)))
    }

    pub(in crate::app) fn transition_progress(&self, started_at: f64, now: f64) -> f32 {
        let duration = self.config.transition_secs;
        if duration <= f32::EPSILON {
            return 1.0;
        }
        ((now - started_at) as f32 / duration).clamp(0.0, 1.0)
    }

    /// Drops finished transitions; returns whether any are still running.
    pub(in crate::app) fn prune_transitions(&mut self, now: f64) -> bool {
        let duration = f64::from(self.config.transition_secs);
        self.transitions
            .retain(|_, transition| now - transition.started_at < duration);
        self.appeared_at
            .retain(|_, started_at| now - *started_at < duration);
        !self.transitions.is_empty() || !self.appeared_at.is_empty()
    }
}
