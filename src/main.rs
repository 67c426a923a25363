//! Customer Lens - Customer Personality Analysis
//!
//! Loads the marketing campaign dataset once per process and explores it
//! through interactive charts.

mod charts;
mod data;
mod gui;
mod view;

use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Customer Personality Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Customer Personality Analysis",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
}
