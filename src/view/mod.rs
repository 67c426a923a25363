//! View module - section routing and chart assembly

mod chart;
mod router;

pub use chart::{BarEntry, BoxCell, BoxGroup, CampaignSum, ChartSpec, PieSlice, GRID_COLUMNS};
pub use router::{compute_view, FilterValue, Section, ViewError, ViewRequest};
