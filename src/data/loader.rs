//! Dataset Loader Module
//! Reads the tab-delimited marketing export once per process and derives
//! the age and enrollment-years columns.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::OnceCell;
use polars::prelude::*;
use thiserror::Error;

/// Backing file, read once on first access to [`dataset`].
pub const DATA_PATH: &str = "marketing_campaign.csv";

/// Columns the dashboard depends on. Loading fails if any is absent.
pub const REQUIRED_COLUMNS: [&str; 19] = [
    "Year_Birth",
    "Education",
    "Marital_Status",
    "Income",
    "Kidhome",
    "Teenhome",
    "Dt_Customer",
    "Recency",
    "MntWines",
    "MntFruits",
    "MntMeatProducts",
    "MntFishProducts",
    "MntSweetProducts",
    "MntGoldProds",
    "AcceptedCmp1",
    "AcceptedCmp2",
    "AcceptedCmp3",
    "AcceptedCmp4",
    "AcceptedCmp5",
];

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to load dataset: {0}")]
    Csv(#[from] PolarsError),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: unparseable enrollment date '{value}'")]
    BadDate { row: usize, value: String },
}

static DATASET: OnceCell<DataFrame> = OnceCell::new();

/// Process-wide dataset accessor.
///
/// The table is read from [`DATA_PATH`] on the first call and memoized for
/// the lifetime of the process; there is no invalidation. Edits to the
/// backing file after the first load are never observed, and the derived
/// `Age` / `nos_year_enroll` columns stay pinned to the wall-clock date of
/// that first load. Two processes started on different days can therefore
/// disagree on the derived columns.
pub fn dataset() -> Result<&'static DataFrame, DataError> {
    DATASET.get_or_try_init(|| load_from(DATA_PATH, Local::now().date_naive()))
}

/// Read a tab-delimited export with a header row and attach the derived
/// columns, with `today` as the reference date.
pub fn load_from(path: &str, today: NaiveDate) -> Result<DataFrame, DataError> {
    let df = LazyCsvReader::new(path)
        .with_separator(b'\t')
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    ensure_required_columns(&df)?;
    with_derived_columns(df, today)
}

/// Check the schema before any column access relies on it.
pub fn ensure_required_columns(df: &DataFrame) -> Result<(), DataError> {
    for name in REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            return Err(DataError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Attach `Age` (today's year - birth year) and `nos_year_enroll`
/// (floor of days since enrollment / 365). Null inputs stay null; a
/// non-null enrollment date that fails to parse aborts the load.
pub fn with_derived_columns(
    mut df: DataFrame,
    today: NaiveDate,
) -> Result<DataFrame, DataError> {
    let births = df.column("Year_Birth")?.cast(&DataType::Int64)?;
    let ages: Vec<Option<i64>> = births
        .i64()?
        .into_iter()
        .map(|year| year.map(|year| i64::from(today.year()) - year))
        .collect();

    let enrolled = df.column("Dt_Customer")?.cast(&DataType::String)?;
    let mut years: Vec<Option<i64>> = Vec::with_capacity(df.height());
    for (row, value) in enrolled.str()?.into_iter().enumerate() {
        match value {
            None => years.push(None),
            Some(raw) => {
                let date = parse_enroll_date(raw).ok_or_else(|| DataError::BadDate {
                    row,
                    value: raw.to_string(),
                })?;
                let days = (today - date).num_days();
                years.push(Some(days.div_euclid(365)));
            }
        }
    }

    df.with_column(Column::new("Age".into(), ages))?;
    df.with_column(Column::new("nos_year_enroll".into(), years))?;
    Ok(df)
}

/// The source export writes day-month-year; the fallbacks cover the other
/// spellings seen in re-exports of the same dataset.
fn parse_enroll_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 3] = ["%d-%m-%Y", "%Y-%m-%d", "%m/%d/%Y"];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Render a single cell for display and grouping.
pub fn fmt_cell(value: &AnyValue) -> String {
    if value.is_null() {
        return String::new();
    }
    value.to_string().trim_matches('"').to_string()
}

/// Sorted distinct non-null values of a column, as display strings.
pub fn unique_values(df: &DataFrame, column: &str) -> Result<Vec<String>, PolarsError> {
    let unique = df.column(column)?.unique()?;
    let series = unique.as_materialized_series();
    let mut values: Vec<String> = series
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| fmt_cell(&v))
        .collect();
    values.sort();
    Ok(values)
}

/// Maximum of a numeric column, ignoring nulls. Used for slider bounds.
pub fn column_max(df: &DataFrame, column: &str) -> Option<f64> {
    let values = df.column(column).ok()?.cast(&DataType::Float64).ok()?;
    values
        .f64()
        .ok()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .reduce(f64::max)
}
