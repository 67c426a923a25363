//! Data module - dataset loading and the field catalog

pub mod features;
mod loader;

pub use loader::{column_max, dataset, fmt_cell, load_from, unique_values, DataError, DATA_PATH};
