mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::StrokeStatsApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env().unwrap_or_else(|e| {
        log::error!("Ignoring config: {e:#}");
        DashboardConfig::default()
    });
    log::info!("Reading data from {}", config.resolve_data_dir().display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Stroke team descriptive statistics",
        options,
        Box::new(|_cc| Ok(Box::new(StrokeStatsApp::new(config)))),
    )
}
