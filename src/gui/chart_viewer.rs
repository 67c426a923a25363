//! Chart Viewer Widget
//! Central panel showing the chart computed for the current selection.

use egui::{Color32, RichText, ScrollArea};
use polars::prelude::DataFrame;

use crate::charts::ChartPlotter;
use crate::data;
use crate::view::{BoxCell, ChartSpec};

const BOX_CELL_HEIGHT: f32 = 260.0;
const TABLE_ROW_HEIGHT: f32 = 18.0;

/// Holds the last computed chart (or the error that replaced it) and
/// renders it each frame.
pub struct ChartViewer {
    chart: Option<ChartSpec>,
    error: Option<String>,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            chart: None,
            error: None,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_chart(&mut self, chart: ChartSpec) {
        self.chart = Some(chart);
        self.error = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.chart = None;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        if let Some(error) = &self.error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(error)
                        .size(14.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }
        let Some(chart) = &self.chart else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        match chart {
            ChartSpec::Table(df) => Self::draw_table(ui, df),
            ChartSpec::Histogram { title, values } => {
                ChartPlotter::draw_histogram(ui, title, values)
            }
            ChartSpec::Pie { title, slices } => ChartPlotter::draw_pie(ui, title, slices),
            ChartSpec::BoxGrid { cells, columns } => Self::draw_box_grid(ui, cells, *columns),
            ChartSpec::Bar { bars } => ChartPlotter::draw_campaign_bar(ui, bars),
            ChartSpec::GroupedBar { group_label, rows } => {
                ChartPlotter::draw_grouped_campaign_bar(ui, group_label, rows)
            }
        }
    }

    /// Fixed grid of spend box plots, each cell independently scaled.
    fn draw_box_grid(ui: &mut egui::Ui, cells: &[BoxCell], columns: usize) {
        let columns = columns.max(1);
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let cell_width = (ui.available_width() - 20.0) / columns as f32;
                for row in cells.chunks(columns) {
                    ui.horizontal(|ui| {
                        for cell in row {
                            ui.vertical(|ui| {
                                ui.set_width(cell_width);
                                ui.label(RichText::new(&cell.title).size(13.0).strong());
                                ChartPlotter::draw_box_cell(ui, cell, BOX_CELL_HEIGHT);
                            });
                        }
                    });
                    ui.add_space(10.0);
                }
            });
    }

    /// Virtualized raw-table view; only visible rows are laid out.
    fn draw_table(ui: &mut egui::Ui, df: &DataFrame) {
        ui.label(RichText::new("Raw data").size(16.0).strong());
        ui.add_space(5.0);

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = df.get_columns();

        ScrollArea::both()
            .auto_shrink([false, false])
            .show_rows(ui, TABLE_ROW_HEIGHT, df.height(), |ui, rows| {
                egui::Grid::new("raw_table")
                    .striped(true)
                    .min_col_width(70.0)
                    .show(ui, |ui| {
                        for name in &names {
                            ui.label(RichText::new(name).strong().size(11.0));
                        }
                        ui.end_row();
                        for i in rows {
                            for column in columns {
                                let text =
                                    column.get(i).map(|v| data::fmt_cell(&v)).unwrap_or_default();
                                ui.label(RichText::new(text).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
