mod app;
mod ui;

use app::DashboardApp;
use eframe::egui;
use personality_dashboard::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load().unwrap_or_else(|e| {
        log::warn!("Using default configuration: {e:#}");
        DashboardConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let title = config.window.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the banner png/jpg.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(config)))
        }),
    )
}
