mod app;

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use log::info;

use semantic_canvas::{AppConfig, init_logging};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON settings file; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `log_level` from the settings file.
    #[arg(long)]
    log_level: Option<String>,

    /// Text to place on the canvas at startup. Repeatable.
    #[arg(long = "seed", value_name = "TEXT")]
    seeds: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;

    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level)
        .map_err(|err| anyhow!(err))
        .context("failed to initialize logging")?;
    info!(
        "starting semantic-canvas: config={} seeds={}",
        args.config
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "defaults".to_owned()),
        args.seeds.len()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    let seeds = args.seeds;
    eframe::run_native(
        "semantic-canvas",
        options,
        Box::new(move |cc| Ok(Box::new(app::SemanticCanvasApp::new(cc, config, seeds)))),
    )
    .map_err(|err| anyhow!("window loop failed: {err}"))
}
