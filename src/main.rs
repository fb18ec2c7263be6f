use clap::Parser;
use eframe::egui;

use shopping_trends::app::DashboardApp;
use shopping_trends::config::Config;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    log::info!("Starting dashboard with {}", config.data.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Consumer Shopping Trends",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(&config)))),
    )
}
