//! Semantic types and the per-column classification report.

mod column;
mod types;

pub use column::{coerce_for_display, ColumnReport, DisplayValue};
pub use types::{Bucket, Hypothesis, OverrideMap};
