mod app;
mod cli;
mod color;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use app::LaunchDashApp;
use cli::Args;
use eframe::egui;
use launch_dash::data;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse_args();
    if let Err(e) = args.validate() {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    // Load once; a dataset that fails to load never reaches the UI.
    let dataset = data::loader::load_file(&args.data)
        .with_context(|| format!("loading launch records from {}", args.data.display()))?;
    log::info!(
        "Loaded {} launches from sites {:?}",
        dataset.len(),
        dataset.distinct_sites()
    );

    let state = AppState::new(Arc::new(dataset), args.data.clone(), args.slider())
        .context("launch records file has no rows")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Records Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
