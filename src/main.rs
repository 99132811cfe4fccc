//! People Dashboard - HR headcount analytics over a personnel CSV export
//!
//! Usage: `people_dashboard [CSV_PATH]`

mod gui;

use eframe::egui;
use gui::DashboardApp;
use people_dashboard::config::DashboardConfig;
use people_dashboard::dashboard::Dashboard;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The CSV is read once, before the window opens.
    let cli_csv = std::env::args_os().nth(1).map(PathBuf::from);
    let today = chrono::Local::now().date_naive();
    let dashboard = DashboardConfig::load(cli_csv)
        .and_then(|config| Dashboard::open(config, today).map_err(anyhow::Error::from));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("People Analytics Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "People Analytics Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, dashboard)))),
    )
}
