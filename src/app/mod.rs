use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use eframe::egui::{self, Context, Pos2};
use log::{error, info};

use semantic_canvas::AppConfig;
use semantic_canvas::layout::{ItemId, LayoutEngine, LayoutFrame, MarkerSet, VectorStore};
use semantic_canvas::provider::Providers;
use semantic_canvas::worker::InsertQueue;

mod canvas;
mod render_utils;
mod ui;

pub struct SemanticCanvasApp {
    config: AppConfig,
    seeds: Vec<String>,
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    config: AppConfig,
    engine: LayoutEngine,
    queue: InsertQueue,
    embedder_name: String,
    store: VectorStore,
    texts: HashMap<ItemId, String>,
    frame: Option<LayoutFrame>,
    markers: MarkerSet,
    transitions: HashMap<ItemId, Transition>,
    appeared_at: HashMap<ItemId, f64>,
    input: String,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    selected: Option<ItemId>,
    last_error: Option<String>,
    item_rows_visible: usize,
}

/// Eased move of one marker from where it was drawn to its new position.
#[derive(Clone, Copy, Debug)]
struct Transition {
    from: Pos2,
    to: Pos2,
    started_at: f64,
}

struct SearchMatchCache {
    query: String,
    item_count: usize,
    matches: Arc<HashSet<ItemId>>,
}

impl SemanticCanvasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, seeds: Vec<String>) -> Self {
        let state = Self::start(&config, &seeds);
        Self {
            config,
            seeds,
            state,
        }
    }

    fn start(config: &AppConfig, seeds: &[String]) -> AppState {
        let providers = match Providers::init(&config.providers) {
            Ok(providers) => providers,
            Err(err) => {
                error!("failed to initialize providers: {err}");
                return AppState::Error(format!("Failed to initialize providers: {err}"));
            }
        };
        let embedder_name = providers.embedder_name().to_owned();

        let queue = match InsertQueue::spawn(providers) {
            Ok(queue) => queue,
            Err(err) => {
                error!("failed to start insert worker: {err}");
                return AppState::Error(format!("Failed to start insert worker: {err}"));
            }
        };

        let mut model = ViewModel::new(config.clone(), queue, embedder_name);
        for seed in seeds {
            model.submit(seed);
        }
        info!("canvas ready, {} seed text(s) queued", model.queue.in_flight());
        AppState::Ready(Box::new(model))
    }
}

impl eframe::App for SemanticCanvasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Semantic canvas could not start");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start(&self.config, &self.seeds));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
