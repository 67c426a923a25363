//! Chart Plotter Module
//! Draws the dashboard charts using egui_plot, plus a painter-drawn pie
//! (egui_plot has no pie primitive).

use egui::{Color32, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot};

use crate::view::{BarEntry, BoxCell, CampaignSum, PieSlice};

/// Color palette for groups and slices.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const CHART_HEIGHT: f32 = 420.0;
const PIE_SIZE: f32 = 340.0;

/// Quartile spread of one box, whiskers clamped to 1.5 IQR.
struct BoxStats {
    whisker_low: f64,
    q1: f64,
    median: f64,
    q3: f64,
    whisker_high: f64,
}

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Histogram of a continuous field, one bar per fixed-width bin.
    pub fn draw_histogram(ui: &mut egui::Ui, title: &str, values: &[f64]) {
        let (width, bins) = Self::histogram_bins(values, 25);
        let bars: Vec<Bar> = bins
            .iter()
            .map(|&(start, count)| Bar::new(start + width / 2.0, count as f64).width(width * 0.95))
            .collect();

        Plot::new("info_histogram")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(title.to_string())
            .y_axis_label("Count")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(Self::color(0)).name(title));
            });
    }

    /// Proportion chart: painter-drawn slices plus a legend column.
    pub fn draw_pie(ui: &mut egui::Ui, title: &str, slices: &[PieSlice]) {
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(8.0);

        let total: u64 = slices.iter().map(|s| u64::from(s.count)).sum();
        if total == 0 {
            ui.label("No rows match the current filter");
            return;
        }

        ui.horizontal(|ui| {
            let (response, painter) =
                ui.allocate_painter(egui::vec2(PIE_SIZE, PIE_SIZE), Sense::hover());
            let rect = response.rect;
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0 - 8.0;

            let mut start = -std::f32::consts::FRAC_PI_2;
            for (i, slice) in slices.iter().enumerate() {
                let sweep = slice.count as f32 / total as f32 * std::f32::consts::TAU;
                if sweep <= 0.0 {
                    continue;
                }
                // Fan of short arc segments; each slice stays convex.
                let steps = ((sweep / 0.05).ceil() as usize).max(2);
                let mut points = Vec::with_capacity(steps + 2);
                points.push(center);
                for step in 0..=steps {
                    let angle = start + sweep * step as f32 / steps as f32;
                    points.push(center + egui::vec2(angle.cos(), angle.sin()) * radius);
                }
                painter.add(Shape::convex_polygon(points, Self::color(i), Stroke::NONE));
                start += sweep;
            }

            ui.add_space(16.0);
            ui.vertical(|ui| {
                for (i, slice) in slices.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, Self::color(i));
                        let share = slice.count as f64 / total as f64 * 100.0;
                        ui.label(
                            RichText::new(format!(
                                "{} - {} ({share:.1}%)",
                                slice.label, slice.count
                            ))
                            .size(12.0),
                        );
                    });
                }
            });
        });
    }

    /// One cell of the spend grid: a box per group, labeled on the x-axis.
    pub fn draw_box_cell(ui: &mut egui::Ui, cell: &BoxCell, height: f32) {
        let labels: Vec<String> = cell
            .groups
            .iter()
            .map(|g| g.label.clone().unwrap_or_default())
            .collect();

        Plot::new(format!("box_{}", cell.title))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, group) in cell.groups.iter().enumerate() {
                    let Some(stats) = Self::box_stats(&group.values) else {
                        continue;
                    };
                    let color = Self::color(i);
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            stats.whisker_low,
                            stats.q1,
                            stats.median,
                            stats.q3,
                            stats.whisker_high,
                        ),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));

                    let name = group.label.clone().unwrap_or_else(|| cell.title.clone());
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(name));
                }
            });
    }

    /// Campaign totals, one bar per campaign.
    pub fn draw_campaign_bar(ui: &mut egui::Ui, bars: &[BarEntry]) {
        let labels: Vec<String> = bars.iter().map(|b| b.campaign.clone()).collect();
        let chart_bars: Vec<Bar> = bars
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Bar::new(i as f64, entry.total as f64)
                    .width(0.6)
                    .fill(Self::color(i))
                    .name(entry.campaign.clone())
            })
            .collect();

        Plot::new("campaign_totals")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Campaign")
            .y_axis_label("Accepted")
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(chart_bars));
            });
    }

    /// Campaign totals split by group value: clustered bars, one color and
    /// legend entry per group.
    pub fn draw_grouped_campaign_bar(ui: &mut egui::Ui, group_label: &str, rows: &[CampaignSum]) {
        let mut campaigns: Vec<String> = Vec::new();
        let mut groups: Vec<String> = Vec::new();
        for row in rows {
            if !campaigns.contains(&row.campaign) {
                campaigns.push(row.campaign.clone());
            }
            if !groups.contains(&row.group) {
                groups.push(row.group.clone());
            }
        }
        if groups.is_empty() {
            ui.label("No rows match the current filter");
            return;
        }

        let slot = 0.8 / groups.len() as f64;
        let labels = campaigns.clone();

        ui.label(
            RichText::new(format!("Accepted campaigns by {group_label}"))
                .size(16.0)
                .strong(),
        );
        Plot::new("campaign_totals_grouped")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("Campaign")
            .y_axis_label("Accepted")
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (gi, group) in groups.iter().enumerate() {
                    let offset = (gi as f64 - (groups.len() as f64 - 1.0) / 2.0) * slot;
                    let bars: Vec<Bar> = campaigns
                        .iter()
                        .enumerate()
                        .map(|(ci, campaign)| {
                            let total = rows
                                .iter()
                                .find(|r| &r.campaign == campaign && &r.group == group)
                                .map(|r| r.total)
                                .unwrap_or(0);
                            Bar::new(ci as f64 + offset, total as f64).width(slot * 0.9)
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).color(Self::color(gi)).name(group));
                }
            });
    }

    /// Fixed-width bins covering the value range. Returns the bin width and
    /// (bin start, count) pairs; empty input yields no bins.
    fn histogram_bins(values: &[f64], target_bins: usize) -> (f64, Vec<(f64, u64)>) {
        let Some(min) = values.iter().copied().reduce(f64::min) else {
            return (1.0, Vec::new());
        };
        let max = values.iter().copied().fold(min, f64::max);
        let width = if max > min {
            Self::nice_step(max - min, target_bins)
        } else {
            1.0
        };
        let start = (min / width).floor() * width;
        let count = (((max - start) / width).floor() as usize) + 1;

        let mut bins = vec![0u64; count];
        for &value in values {
            let idx = (((value - start) / width).floor() as usize).min(count - 1);
            bins[idx] += 1;
        }
        let bins = bins
            .iter()
            .enumerate()
            .map(|(i, &c)| (start + i as f64 * width, c))
            .collect();
        (width, bins)
    }

    /// Round a raw step up to the nearest 1/2/5 x 10^k.
    fn nice_step(range: f64, target_steps: usize) -> f64 {
        let raw_step = range / target_steps as f64;
        let magnitude = 10f64.powf(raw_step.log10().floor());
        let normalized = raw_step / magnitude;

        let nice = if normalized <= 1.0 {
            1.0
        } else if normalized <= 2.0 {
            2.0
        } else if normalized <= 5.0 {
            5.0
        } else {
            10.0
        };

        nice * magnitude
    }

    fn box_stats(values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        let q1 = sorted[n / 4];
        let median = sorted[n / 2];
        let q3 = sorted[3 * n / 4];
        let iqr = q3 - q1;
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        Some(BoxStats {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_bins_cover_every_value() {
        let values = [1.0, 2.0, 2.5, 9.0, 9.9];
        let (width, bins) = ChartPlotter::histogram_bins(&values, 10);
        assert!(width > 0.0);
        let total: u64 = bins.iter().map(|&(_, c)| c).sum();
        assert_eq!(total as usize, values.len());
    }

    #[test]
    fn histogram_of_nothing_is_empty_not_a_panic() {
        let (_, bins) = ChartPlotter::histogram_bins(&[], 10);
        assert!(bins.is_empty());
    }

    #[test]
    fn histogram_of_a_single_value_has_one_occupied_bin() {
        let (_, bins) = ChartPlotter::histogram_bins(&[42.0], 10);
        let total: u64 = bins.iter().map(|&(_, c)| c).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn nice_step_snaps_to_1_2_5() {
        assert_eq!(ChartPlotter::nice_step(100.0, 10), 10.0);
        assert_eq!(ChartPlotter::nice_step(70.0, 10), 10.0);
        assert_eq!(ChartPlotter::nice_step(35.0, 10), 5.0);
        assert_eq!(ChartPlotter::nice_step(13.0, 10), 2.0);
    }

    #[test]
    fn box_stats_order_the_spread() {
        let stats = ChartPlotter::box_stats(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert!(stats.whisker_low <= stats.q1);
        assert!(stats.q1 <= stats.median);
        assert!(stats.median <= stats.q3);
        assert!(stats.q3 <= stats.whisker_high);
    }

    #[test]
    fn box_stats_of_nothing_is_none() {
        assert!(ChartPlotter::box_stats(&[]).is_none());
    }
}
