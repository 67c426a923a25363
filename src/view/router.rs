//! View Router Module
//! Turns one interaction's selector state into a filtered view of the
//! table and a single chart.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use thiserror::Error;

use crate::data::features::{
    feature_by_label, Feature, FieldKind, UnknownFeature, CAMPAIGNS, FEATURES, SPEND_ITEMS,
};
use crate::data::fmt_cell;

use super::chart::{
    BarEntry, BoxCell, BoxGroup, CampaignSum, ChartSpec, PieSlice, GRID_COLUMNS,
};

#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    UnknownFeature(#[from] UnknownFeature),
    #[error("view computation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Top-level dashboard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    RawData,
    CustomerInfo,
    Purchasing,
    Marketing,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::RawData,
        Section::CustomerInfo,
        Section::Purchasing,
        Section::Marketing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::RawData => "Raw Data",
            Section::CustomerInfo => "Customer Information",
            Section::Purchasing => "Purchasing Behavior",
            Section::Marketing => "Marketing Performance",
        }
    }
}

/// Filter input captured from the active widget.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Boundary-exclusive numeric range: keep rows with `lo < v < hi`.
    /// Both endpoints are dropped, so `lo == hi` matches nothing.
    Range { lo: f64, hi: f64 },
    /// Selected distinct values of a categorical field. An empty set is a
    /// valid filter that matches nothing.
    Members(BTreeSet<String>),
}

/// One interaction's worth of selector state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRequest {
    pub section: Section,
    /// Chart category (Customer Information) or grouping field
    /// (Purchasing/Marketing); `None` means ungrouped where allowed.
    pub category: Option<String>,
    /// Filter field label; only Customer Information filters a field other
    /// than its category.
    pub filter_field: Option<String>,
    pub filter_value: Option<FilterValue>,
}

impl ViewRequest {
    pub fn section(section: Section) -> Self {
        Self {
            section,
            category: None,
            filter_field: None,
            filter_value: None,
        }
    }
}

/// Compute the chart for one interaction. Recomputes from the full table
/// every time; nothing here mutates `df`.
pub fn compute_view(df: &DataFrame, request: &ViewRequest) -> Result<ChartSpec, ViewError> {
    match request.section {
        Section::RawData => Ok(ChartSpec::Table(df.clone())),
        Section::CustomerInfo => customer_info(df, request),
        Section::Purchasing => purchasing(df, request),
        Section::Marketing => marketing(df, request),
    }
}

fn customer_info(df: &DataFrame, request: &ViewRequest) -> Result<ChartSpec, ViewError> {
    let feature = match &request.category {
        Some(label) => feature_by_label(label)?,
        // Selectboxes always hold a value; stay total anyway.
        None => &FEATURES[0],
    };

    let filtered = match (&request.filter_field, &request.filter_value) {
        (Some(label), Some(value)) => apply_filter(df, feature_by_label(label)?, value)?,
        _ => df.clone(),
    };

    match feature.kind {
        FieldKind::Continuous => Ok(ChartSpec::Histogram {
            title: feature.label.to_string(),
            values: numeric_values(&filtered, feature.column)?,
        }),
        FieldKind::Categorical => {
            let slices = group_counts(&filtered, feature.column)?
                .into_iter()
                .map(|(label, count)| PieSlice { label, count })
                .collect();
            Ok(ChartSpec::Pie {
                title: format!("Proportion of {}", feature.label),
                slices,
            })
        }
    }
}

fn purchasing(df: &DataFrame, request: &ViewRequest) -> Result<ChartSpec, ViewError> {
    let (filtered, group) = resolve_grouping(df, request)?;
    let mut cells = Vec::with_capacity(SPEND_ITEMS.len());
    for (column, label) in SPEND_ITEMS {
        let groups = match group {
            None => vec![BoxGroup {
                label: None,
                values: numeric_values(&filtered, column)?,
            }],
            Some(feature) => split_values(&filtered, column, feature.column)?,
        };
        cells.push(BoxCell {
            title: format!("Amount Spend on {label}"),
            groups,
        });
    }
    Ok(ChartSpec::BoxGrid {
        cells,
        columns: GRID_COLUMNS,
    })
}

fn marketing(df: &DataFrame, request: &ViewRequest) -> Result<ChartSpec, ViewError> {
    let (filtered, group) = resolve_grouping(df, request)?;
    let Some(feature) = group else {
        let mut bars = Vec::with_capacity(CAMPAIGNS.len());
        for campaign in CAMPAIGNS {
            bars.push(BarEntry {
                campaign: campaign.to_string(),
                total: flag_sum(&filtered, campaign)?,
            });
        }
        return Ok(ChartSpec::Bar { bars });
    };

    // Per-(group, campaign) sums, then reshaped to long format.
    let group_column = filtered.column(feature.column)?;
    let mut flag_columns: Vec<Int64Chunked> = Vec::with_capacity(CAMPAIGNS.len());
    for campaign in CAMPAIGNS {
        flag_columns.push(filtered.column(campaign)?.cast(&DataType::Int64)?.i64()?.clone());
    }

    let mut totals: BTreeMap<String, [i64; CAMPAIGNS.len()]> = BTreeMap::new();
    for i in 0..filtered.height() {
        let Ok(group_value) = group_column.get(i) else {
            continue;
        };
        if group_value.is_null() {
            continue;
        }
        let sums = totals.entry(fmt_cell(&group_value)).or_insert([0; CAMPAIGNS.len()]);
        for (slot, flags) in sums.iter_mut().zip(&flag_columns) {
            if let Some(flag) = flags.get(i) {
                *slot += flag;
            }
        }
    }

    let mut rows = Vec::with_capacity(totals.len() * CAMPAIGNS.len());
    for (group_value, sums) in totals {
        for (campaign, total) in CAMPAIGNS.iter().zip(sums) {
            rows.push(CampaignSum {
                campaign: campaign.to_string(),
                group: group_value.clone(),
                total,
            });
        }
    }
    Ok(ChartSpec::GroupedBar {
        group_label: feature.label.to_string(),
        rows,
    })
}

/// Grouping selection for the Purchasing and Marketing sections.
///
/// A continuous selection never splits the chart; it only narrows rows via
/// the range widget. A categorical selection splits and is never filtered.
fn resolve_grouping(
    df: &DataFrame,
    request: &ViewRequest,
) -> Result<(DataFrame, Option<&'static Feature>), ViewError> {
    let Some(label) = &request.category else {
        return Ok((df.clone(), None));
    };
    let feature = feature_by_label(label)?;
    match feature.kind {
        FieldKind::Continuous => {
            let filtered = match &request.filter_value {
                Some(value @ FilterValue::Range { .. }) => apply_filter(df, feature, value)?,
                _ => df.clone(),
            };
            Ok((filtered, None))
        }
        FieldKind::Categorical => Ok((df.clone(), Some(feature))),
    }
}

/// Apply the widget-appropriate filter for `feature`.
///
/// A value whose shape does not match the field's kind (stale widget state
/// while the user is mid-switch) is treated as no filter.
fn apply_filter(
    df: &DataFrame,
    feature: &Feature,
    value: &FilterValue,
) -> Result<DataFrame, ViewError> {
    match (feature.kind, value) {
        (FieldKind::Continuous, FilterValue::Range { lo, hi }) => {
            let filtered = df
                .clone()
                .lazy()
                .filter(col(feature.column).gt(lit(*lo)).and(col(feature.column).lt(lit(*hi))))
                .collect()?;
            Ok(filtered)
        }
        (FieldKind::Categorical, FilterValue::Members(selected)) => {
            let column = df.column(feature.column)?;
            let mask: Vec<bool> = (0..df.height())
                .map(|i| {
                    column
                        .get(i)
                        .ok()
                        .is_some_and(|v| !v.is_null() && selected.contains(&fmt_cell(&v)))
                })
                .collect();
            let mask = BooleanChunked::from_slice("mask".into(), &mask);
            Ok(df.filter(&mask)?)
        }
        _ => Ok(df.clone()),
    }
}

/// Non-null values of a numeric column as f64.
fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, ViewError> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Rows per distinct non-null value, sorted by value.
fn group_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, u32)>, ViewError> {
    let series = df.column(column)?;
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for i in 0..df.height() {
        let Ok(value) = series.get(i) else {
            continue;
        };
        if !value.is_null() {
            *counts.entry(fmt_cell(&value)).or_insert(0) += 1;
        }
    }
    Ok(counts.into_iter().collect())
}

/// Spend values split by distinct group value, sorted by group.
fn split_values(
    df: &DataFrame,
    value_column: &str,
    group_column: &str,
) -> Result<Vec<BoxGroup>, ViewError> {
    let groups = df.column(group_column)?;
    let values = df.column(value_column)?.cast(&DataType::Float64)?;
    let values = values.f64()?;

    let mut by_group: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for i in 0..df.height() {
        let (Ok(group_value), Some(value)) = (groups.get(i), values.get(i)) else {
            continue;
        };
        if !group_value.is_null() && !value.is_nan() {
            by_group.entry(fmt_cell(&group_value)).or_default().push(value);
        }
    }
    Ok(by_group
        .into_iter()
        .map(|(label, values)| BoxGroup {
            label: Some(label),
            values,
        })
        .collect())
}

/// Sum of a 0/1 acceptance column.
fn flag_sum(df: &DataFrame, column: &str) -> Result<i64, ViewError> {
    let flags = df.column(column)?.cast(&DataType::Int64)?;
    Ok(flags.i64()?.into_iter().flatten().sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(section: Section) -> ViewRequest {
        ViewRequest::section(section)
    }

    fn income_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Income".into(), vec![10.0f64, 50.0, 90.0]),
            Column::new("Education".into(), vec!["Basic", "PhD", "PhD"]),
        ])
        .unwrap()
    }

    fn campaign_frame() -> DataFrame {
        // Row A accepted campaigns {1, 3}; row B accepted {1, 5}.
        DataFrame::new(vec![
            Column::new("Education".into(), vec!["PhD", "Basic"]),
            Column::new("AcceptedCmp1".into(), vec![1i64, 1]),
            Column::new("AcceptedCmp2".into(), vec![0i64, 0]),
            Column::new("AcceptedCmp3".into(), vec![1i64, 0]),
            Column::new("AcceptedCmp4".into(), vec![0i64, 0]),
            Column::new("AcceptedCmp5".into(), vec![0i64, 1]),
        ])
        .unwrap()
    }

    fn spend_frame() -> DataFrame {
        let mut columns = vec![Column::new(
            "Marital_Status".into(),
            vec!["Single", "Married", "Single", "Married"],
        )];
        for (column, _) in SPEND_ITEMS {
            columns.push(Column::new(column.into(), vec![1.0f64, 2.0, 3.0, 4.0]));
        }
        DataFrame::new(columns).unwrap()
    }

    fn histogram_values(chart: ChartSpec) -> Vec<f64> {
        match chart {
            ChartSpec::Histogram { values, .. } => values,
            other => panic!("expected histogram, got {other:?}"),
        }
    }

    #[test]
    fn range_filter_is_boundary_exclusive() {
        let df = income_frame();
        let mut req = request(Section::CustomerInfo);
        req.category = Some("Income".to_string());
        req.filter_field = Some("Income".to_string());
        req.filter_value = Some(FilterValue::Range { lo: 20.0, hi: 100.0 });

        // 10 is below the range; 90 survives but a value at 100 would not.
        let values = histogram_values(compute_view(&df, &req).unwrap());
        assert_eq!(values, vec![50.0, 90.0]);
    }

    #[test]
    fn range_filter_drops_rows_on_the_boundary() {
        let df = income_frame();
        let mut req = request(Section::CustomerInfo);
        req.category = Some("Income".to_string());
        req.filter_field = Some("Income".to_string());
        req.filter_value = Some(FilterValue::Range { lo: 10.0, hi: 90.0 });

        assert_eq!(histogram_values(compute_view(&df, &req).unwrap()), vec![50.0]);
    }

    #[test]
    fn equal_range_bounds_match_nothing() {
        let df = income_frame();
        let mut req = request(Section::CustomerInfo);
        req.category = Some("Income".to_string());
        req.filter_field = Some("Income".to_string());
        req.filter_value = Some(FilterValue::Range { lo: 50.0, hi: 50.0 });

        assert!(histogram_values(compute_view(&df, &req).unwrap()).is_empty());
    }

    #[test]
    fn multiselect_with_all_values_keeps_every_row() {
        let df = income_frame();
        let mut req = request(Section::CustomerInfo);
        req.category = Some("Education Level".to_string());
        req.filter_field = Some("Education Level".to_string());
        req.filter_value = Some(FilterValue::Members(
            ["Basic".to_string(), "PhD".to_string()].into(),
        ));

        let ChartSpec::Pie { slices, .. } = compute_view(&df, &req).unwrap() else {
            panic!("expected pie");
        };
        let total: u32 = slices.iter().map(|s| s.count).sum();
        assert_eq!(total as usize, df.height());
    }

    #[test]
    fn empty_multiselect_yields_an_empty_chart_not_an_error() {
        let df = income_frame();
        let mut req = request(Section::CustomerInfo);
        req.category = Some("Education Level".to_string());
        req.filter_field = Some("Education Level".to_string());
        req.filter_value = Some(FilterValue::Members(BTreeSet::new()));

        let ChartSpec::Pie { slices, .. } = compute_view(&df, &req).unwrap() else {
            panic!("expected pie");
        };
        assert!(slices.is_empty());
    }

    #[test]
    fn pie_counts_sum_to_the_filtered_row_count() {
        let df = income_frame();
        let mut req = request(Section::CustomerInfo);
        req.category = Some("Education Level".to_string());
        req.filter_field = Some("Education Level".to_string());
        req.filter_value = Some(FilterValue::Members(["PhD".to_string()].into()));

        let ChartSpec::Pie { slices, title } = compute_view(&df, &req).unwrap() else {
            panic!("expected pie");
        };
        assert_eq!(title, "Proportion of Education Level");
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].count, 2);
    }

    #[test]
    fn ungrouped_marketing_sums_each_campaign() {
        let mut req = request(Section::Marketing);
        req.category = None;
        let ChartSpec::Bar { bars } = compute_view(&campaign_frame(), &req).unwrap() else {
            panic!("expected bar chart");
        };
        let totals: Vec<i64> = bars.iter().map(|b| b.total).collect();
        assert_eq!(totals, vec![2, 0, 1, 0, 1]);
        assert_eq!(bars[0].campaign, "AcceptedCmp1");
    }

    #[test]
    fn grouped_marketing_melts_to_long_format() {
        let mut req = request(Section::Marketing);
        req.category = Some("Education Level".to_string());
        let ChartSpec::GroupedBar { group_label, rows } =
            compute_view(&campaign_frame(), &req).unwrap()
        else {
            panic!("expected grouped bar chart");
        };
        assert_eq!(group_label, "Education Level");
        // 2 group values x 5 campaigns.
        assert_eq!(rows.len(), 10);
        let lookup = |group: &str, campaign: &str| {
            rows.iter()
                .find(|r| r.group == group && r.campaign == campaign)
                .map(|r| r.total)
        };
        assert_eq!(lookup("PhD", "AcceptedCmp1"), Some(1));
        assert_eq!(lookup("PhD", "AcceptedCmp3"), Some(1));
        assert_eq!(lookup("PhD", "AcceptedCmp5"), Some(0));
        assert_eq!(lookup("Basic", "AcceptedCmp5"), Some(1));
    }

    #[test]
    fn campaign_sums_are_order_independent() {
        let df = campaign_frame();
        let reversed = df.reverse();
        let mut req = request(Section::Marketing);
        req.category = Some("Education Level".to_string());

        let ChartSpec::GroupedBar { rows: a, .. } = compute_view(&df, &req).unwrap() else {
            panic!("expected grouped bar chart");
        };
        let ChartSpec::GroupedBar { rows: b, .. } = compute_view(&reversed, &req).unwrap() else {
            panic!("expected grouped bar chart");
        };
        assert_eq!(a, b);
    }

    #[test]
    fn purchasing_grid_has_six_cells_split_by_group() {
        let mut req = request(Section::Purchasing);
        req.category = Some("Marital Status".to_string());
        let ChartSpec::BoxGrid { cells, columns } =
            compute_view(&spend_frame(), &req).unwrap()
        else {
            panic!("expected box grid");
        };
        assert_eq!(columns, GRID_COLUMNS);
        assert_eq!(cells.len(), 6);
        for cell in &cells {
            assert_eq!(cell.groups.len(), 2);
            let labels: Vec<&str> = cell
                .groups
                .iter()
                .filter_map(|g| g.label.as_deref())
                .collect();
            assert_eq!(labels, vec!["Married", "Single"]);
            for group in &cell.groups {
                assert_eq!(group.values.len(), 2);
            }
        }
    }

    #[test]
    fn ungrouped_purchasing_has_one_box_per_cell() {
        let req = request(Section::Purchasing);
        let ChartSpec::BoxGrid { cells, .. } = compute_view(&spend_frame(), &req).unwrap()
        else {
            panic!("expected box grid");
        };
        assert!(cells
            .iter()
            .all(|c| c.groups.len() == 1 && c.groups[0].label.is_none()));
        assert_eq!(cells[0].title, "Amount Spend on Wines");
    }

    #[test]
    fn continuous_grouping_filters_but_does_not_split() {
        let mut columns = vec![
            Column::new("Income".into(), vec![10.0f64, 50.0, 90.0]),
            Column::new("Marital_Status".into(), vec!["Single", "Married", "Single"]),
        ];
        for (column, _) in SPEND_ITEMS {
            columns.push(Column::new(column.into(), vec![1.0f64, 2.0, 3.0]));
        }
        let df = DataFrame::new(columns).unwrap();

        let mut req = request(Section::Purchasing);
        req.category = Some("Income".to_string());
        req.filter_value = Some(FilterValue::Range { lo: 20.0, hi: 100.0 });
        let ChartSpec::BoxGrid { cells, .. } = compute_view(&df, &req).unwrap() else {
            panic!("expected box grid");
        };
        for cell in &cells {
            assert_eq!(cell.groups.len(), 1);
            assert!(cell.groups[0].label.is_none());
            assert_eq!(cell.groups[0].values, vec![2.0, 3.0]);
        }
    }

    #[test]
    fn unknown_feature_label_surfaces_as_an_error() {
        let mut req = request(Section::CustomerInfo);
        req.category = Some("Shoe Size".to_string());
        let err = compute_view(&income_frame(), &req).unwrap_err();
        assert!(matches!(err, ViewError::UnknownFeature(_)));
    }

    #[test]
    fn raw_section_passes_the_table_through() {
        let df = income_frame();
        let ChartSpec::Table(table) = compute_view(&df, &request(Section::RawData)).unwrap()
        else {
            panic!("expected table");
        };
        assert_eq!(table.height(), df.height());
        assert_eq!(table.width(), df.width());
    }
}
