mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::Result;
use app::DashboardApp;
use clap::Parser;
use config::{Args, DashboardConfig};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = DashboardConfig::resolve(&args)?;

    // A failed startup load still opens the window, with the error shown.
    let mut state = AppState::new(config.clone());
    state.load_path(&config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Superstore Campaign Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
