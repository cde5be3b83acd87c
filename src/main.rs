mod app;
mod color;
mod state;
mod ui;

use anyhow::Result;
use app::TradeDashApp;
use clap::Parser;
use eframe::egui;

use trade_dash::config::{Cli, DashboardConfig};

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from(Cli::parse());
    let mut app = TradeDashApp::new(config.clone());

    // A dataset named on the command line must load, or we do not start.
    if let Some(path) = &config.dataset {
        app.state.load(path)?;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Imports and Exports Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
