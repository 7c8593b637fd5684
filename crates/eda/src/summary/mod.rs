//! Column bucketing, statistics and the printed report.

mod report;
mod statistics;
mod summarizer;

pub use statistics::{
    preview, quantile, CategoricalSummary, ColumnStatistics, NumericSummary, TimeSummary,
    TopValue,
};
pub use summarizer::{
    bucket_for, summarize, ColumnInfo, ColumnSummary, Summarizer, Summary, SummaryConfig,
};
