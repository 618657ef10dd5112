use std::collections::HashMap;
use std::time::Duration;

use eframe::egui::{self, Align, Color32, Context, Key, Layout, RichText};
use log::warn;

use semantic_canvas::AppConfig;
use semantic_canvas::error::InsertError;
use semantic_canvas::layout::{ItemId, LayoutEngine, MarkerSet, VectorStore};
use semantic_canvas::worker::InsertQueue;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) const INITIAL_ITEM_ROWS: usize = 40;
    pub(in crate::app) const ITEM_PAGE_ROWS: usize = 40;
    pub(in crate::app) const ITEM_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(config: AppConfig, queue: InsertQueue, embedder_name: String) -> Self {
        let engine = LayoutEngine::new(&config.layout, config.marker);
        Self {
            config,
            engine,
            queue,
            embedder_name,
            store: VectorStore::new(),
            texts: HashMap::new(),
            frame: None,
            markers: MarkerSet::new(),
            transitions: HashMap::new(),
            appeared_at: HashMap::new(),
            input: String::new(),
            search: String::new(),
            search_match_cache: None,
            selected: None,
            last_error: None,
            item_rows_visible: Self::INITIAL_ITEM_ROWS,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("semantic-canvas");
                    ui.separator();
                    ui.label(format!("items: {}", self.store.len()));
                    if let Some(dimensions) = self.store.dimensions() {
                        ui.label(format!("dimensions: {dimensions}"));
                    }
                    ui.label(format!("embedder: {}", self.embedder_name));
                    ui.label(format!("reducer: {}", self.engine.reducer_name()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let pending = self.queue.in_flight();
                        if pending > 0 {
                            ui.spinner();
                            ui.label(format!("embedding {pending} pending"));
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("input_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_input(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));

        if self.queue.in_flight() > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }

    fn draw_input(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        let mut submit = false;
        ui.horizontal(|ui| {
            let add_width = 72.0;
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text("Type a sentence and press Enter")
                    .desired_width(ui.available_width() - add_width),
            );
            if response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                submit = true;
                response.request_focus();
            }
            if ui
                .add_enabled(!self.input.trim().is_empty(), egui::Button::new("Add"))
                .clicked()
            {
                submit = true;
            }
        });

        if submit {
            let text = std::mem::take(&mut self.input);
            self.submit(&text);
        }

        if let Some(error) = self.last_error.clone() {
            let dismissed = ui
                .horizontal(|ui| {
                    ui.label(RichText::new(error).color(Color32::from_rgb(241, 120, 100)));
                    ui.small_button("Dismiss").clicked()
                })
                .inner;
            if dismissed {
                self.last_error = None;
            }
        }
        ui.add_space(4.0);
    }

    pub(in crate::app) fn submit(&mut self, text: &str) {
        match self.queue.submit(text) {
            Ok(_) => {}
            Err(InsertError::EmptyInput) => {}
            Err(err) => {
                warn!("could not queue input: {err}");
                self.last_error = Some(format!("Could not queue input: {err}"));
            }
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<ItemId>) {
        if self.selected != selected {
            log::debug!("selection changed: {selected:?}");
            self.selected = selected;
        }
    }
}
