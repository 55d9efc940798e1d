mod app;
mod callbacks;
mod chart;
mod color;
mod data;
mod layout;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use app::LaunchDashboardApp;
use clap::Parser;
use data::model::Dataset;
use eframe::egui;
use state::AppState;

#[derive(Parser, Debug)]
#[command(version, about = "Launch success dashboard")]
struct Cli {
    /// Launch records to show instead of the built-in sample (.csv, .json, .parquet).
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long, default_value_t = 1200.0)]
    width: f32,
    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut state = AppState::new(Arc::new(Dataset::sample()), "built-in sample")?;
    if let Some(path) = &cli.data {
        state.load_path(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
