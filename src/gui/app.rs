//! Dashboard Application
//! Main window with the control panel on the left and the chart area in
//! the center.

use eframe::egui;
use egui::{CentralPanel, Color32, RichText, ScrollArea, SidePanel};
use polars::prelude::DataFrame;

use crate::data;
use crate::gui::{ChartViewer, ControlPanel};
use crate::view::{self, ViewRequest};

/// Main application window.
pub struct DashboardApp {
    dataset: Result<&'static DataFrame, String>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    last_request: Option<ViewRequest>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let dataset = data::dataset().map_err(|e| {
            log::error!("dataset load failed: {e}");
            e.to_string()
        });
        if let Ok(df) = &dataset {
            log::info!(
                "loaded {} rows x {} columns from {}",
                df.height(),
                df.width(),
                data::DATA_PATH
            );
        }

        Self {
            dataset,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            last_request: None,
        }
    }

    /// One recomputation pass per interaction; identical requests are
    /// skipped so idle frames cost nothing.
    fn recompute(&mut self, df: &DataFrame, request: ViewRequest) {
        if self.last_request.as_ref() == Some(&request) {
            return;
        }
        match view::compute_view(df, &request) {
            Ok(chart) => self.chart_viewer.set_chart(chart),
            Err(e) => {
                log::error!("view computation failed: {e}");
                self.chart_viewer.set_error(e.to_string());
            }
        }
        self.last_request = Some(request);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let df = match &self.dataset {
            Ok(df) => *df,
            Err(message) => {
                let message = message.clone();
                CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            RichText::new(format!("Failed to load dataset: {message}"))
                                .size(16.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    });
                });
                return;
            }
        };

        let mut request = None;
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    request = Some(self.control_panel.show(ui, df));
                });
            });
        if let Some(request) = request {
            self.recompute(df, request);
        }

        CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
