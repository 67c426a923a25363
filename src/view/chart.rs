//! Chart model: the computed description handed to the GUI for rendering.

use polars::prelude::DataFrame;

/// Spend box plots are arranged in a fixed grid this many columns wide.
pub const GRID_COLUMNS: usize = 2;

/// One slice of a proportion chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: u32,
}

/// One box plot within a grid cell. `label` is the group value when the
/// cell is split, `None` for a single unsplit box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub label: Option<String>,
    pub values: Vec<f64>,
}

/// One spend category's cell in the box-plot grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCell {
    pub title: String,
    pub groups: Vec<BoxGroup>,
}

/// Acceptance total for one campaign across the filtered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BarEntry {
    pub campaign: String,
    pub total: i64,
}

/// One long-format row of the grouped campaign aggregation:
/// (campaign, group value, sum of acceptances).
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSum {
    pub campaign: String,
    pub group: String,
    pub total: i64,
}

/// Everything the chart area needs to draw one view. Variants map 1:1 to
/// the chart types the sections can produce; all of them render cleanly
/// with zero rows.
#[derive(Debug, Clone)]
pub enum ChartSpec {
    /// Full table, verbatim.
    Table(DataFrame),
    /// Distribution of one continuous field.
    Histogram { title: String, values: Vec<f64> },
    /// Row share per distinct value of one categorical field.
    Pie { title: String, slices: Vec<PieSlice> },
    /// Spend distributions, one cell per spend category, optionally split.
    BoxGrid { cells: Vec<BoxCell>, columns: usize },
    /// Campaign totals, one bar per campaign.
    Bar { bars: Vec<BarEntry> },
    /// Campaign totals per group value, long format, colored by group.
    GroupedBar {
        group_label: String,
        rows: Vec<CampaignSum>,
    },
}
