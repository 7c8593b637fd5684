//! Column bucketing and per-bucket statistics.
//!
//! Every column is placed into exactly one bucket (int, float, category,
//! other or time) by looking at its storage kind and an optional override
//! tag. Columns no bucket accepts are reported as diagnostics and left out of
//! the result.

use indexmap::IndexMap;
use tracing::debug;

use crate::diagnostic::Diagnostic;
use crate::input::{Column, NativeKind, Table, Value};
use crate::schema::{Bucket, OverrideMap};

use super::statistics::{
    preview, CategoricalSummary, ColumnStatistics, NumericSummary, TimeSummary,
};

// =============================================================================
// OVERRIDE VOCABULARY
// =============================================================================
// Tags accepted in the override map. Both dtype strings and the semantic
// labels written by the classifier are understood.

const INTEGER_TAGS: &[&str] = &["int64", "uint8", "int"];
const FLOAT_TAGS: &[&str] = &["float64", "float"];
const CATEGORY_TAGS: &[&str] = &["category"];
const OTHER_TAGS: &[&str] = &["object", "category", "str", "text", "identifier"];

/// Configuration for the summarizer.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Columns with at most this many distinct values trigger a
    /// low-cardinality advisory.
    pub low_cardinality_threshold: usize,
    /// Maximum length of the rendered value previews.
    pub preview_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            low_cardinality_threshold: 50,
            preview_chars: 40,
        }
    }
}

/// Frequency metadata gathered for every column, bucketed or not.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    /// `None` when no bucket accepts the column.
    pub bucket: Option<Bucket>,
    /// Occurrences of the most frequent value; `None` for an empty column.
    pub top_count_val: Option<usize>,
    /// Distinct non-missing values, most frequent first.
    pub value_list: Vec<Value>,
    pub value_count: usize,
}

/// Statistics for one bucketed column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub bucket: Bucket,
    pub statistics: ColumnStatistics,
}

/// Result of summarizing a table.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Number of rows.
    pub datapoints: usize,
    /// Bucketed columns in report order.
    pub columns: Vec<ColumnSummary>,
    pub diagnostics: Vec<Diagnostic>,
    /// Width of the name column in the printed report.
    pub(crate) name_width: usize,
}

impl Summary {
    /// Column name to type name, grouped by bucket in report order.
    ///
    /// The `other` bucket is reported as `str`.
    pub fn column_types(&self) -> IndexMap<String, &'static str> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.bucket.type_name()))
            .collect()
    }

    /// Columns in one bucket.
    pub fn bucket(&self, bucket: Bucket) -> impl Iterator<Item = &ColumnSummary> {
        self.columns.iter().filter(move |c| c.bucket == bucket)
    }

    /// Look up a bucketed column.
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Buckets and summarizes tables.
pub struct Summarizer {
    config: SummaryConfig,
}

impl Summarizer {
    /// Create a summarizer with default settings.
    pub fn new() -> Self {
        Self {
            config: SummaryConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(config: SummaryConfig) -> Self {
        Self { config }
    }

    /// Summarize every column of the table.
    pub fn summarize(&self, table: &Table, overrides: &OverrideMap) -> Summary {
        let mut diagnostics = Vec::new();
        let mut by_bucket: IndexMap<Bucket, Vec<ColumnSummary>> =
            Bucket::ALL.iter().map(|b| (*b, Vec::new())).collect();

        for column in table.columns() {
            let override_type = overrides.get(&column.name).map(String::as_str);
            let info = self.column_info(column, override_type);

            if let Some(diagnostic) = self.check_cardinality(column, &info, override_type) {
                diagnostic.log();
                diagnostics.push(diagnostic);
            }

            let Some(bucket) = info.bucket else {
                let diagnostic = Diagnostic::unrecognized_kind(&column.name, column.kind.dtype());
                diagnostic.log();
                diagnostics.push(diagnostic);
                continue;
            };

            debug!(column = %column.name, bucket = %bucket, "bucketed column");
            let statistics = self.statistics(column, bucket);
            by_bucket.entry(bucket).or_default().push(ColumnSummary {
                name: column.name.clone(),
                bucket,
                statistics,
            });
        }

        let name_width = table
            .columns()
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0);

        Summary {
            datapoints: table.row_count(),
            columns: by_bucket.into_values().flatten().collect(),
            diagnostics,
            name_width,
        }
    }

    /// Frequency metadata and bucket for a column.
    pub fn column_info(&self, column: &Column, override_type: Option<&str>) -> ColumnInfo {
        let counts = column.value_counts();
        let top_count_val = counts.first().map(|(_, count)| *count);
        let value_list: Vec<Value> = counts.into_iter().map(|(value, _)| value).collect();

        ColumnInfo {
            name: column.name.clone(),
            bucket: bucket_for(column.kind, override_type),
            top_count_val,
            value_count: value_list.len(),
            value_list,
        }
    }

    fn check_cardinality(
        &self,
        column: &Column,
        info: &ColumnInfo,
        override_type: Option<&str>,
    ) -> Option<Diagnostic> {
        let suspicious = info.value_count <= self.config.low_cardinality_threshold
            && column.kind != NativeKind::Category
            && override_type.is_none();
        if !suspicious {
            return None;
        }
        let values: Vec<&Value> = info.value_list.iter().collect();
        Some(Diagnostic::low_cardinality(
            &column.name,
            info.value_count,
            &preview(&values, usize::MAX),
        ))
    }

    fn statistics(&self, column: &Column, bucket: Bucket) -> ColumnStatistics {
        let non_missing = column.non_missing_count();
        match bucket {
            // Only cells with a numeric reading count; text in a column
            // overridden to a number is left out of both count and summary.
            Bucket::Int | Bucket::Float => {
                let values = column.numeric_values();
                ColumnStatistics::Numeric {
                    non_missing: values.len(),
                    summary: NumericSummary::from_values(&values),
                }
            }
            Bucket::Category | Bucket::Other => ColumnStatistics::Categorical {
                non_missing,
                summary: CategoricalSummary::from_value_counts(
                    &column.value_counts(),
                    self.config.preview_chars,
                ),
            },
            Bucket::Time => ColumnStatistics::Time {
                non_missing,
                summary: TimeSummary::from_column(column),
            },
        }
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Summarize a table with the default configuration.
pub fn summarize(table: &Table, overrides: &OverrideMap) -> Summary {
    Summarizer::new().summarize(table, overrides)
}

/// Bucket for a storage kind and optional override tag; first match wins.
pub fn bucket_for(kind: NativeKind, override_type: Option<&str>) -> Option<Bucket> {
    let tagged = |tags: &[&str]| override_type.is_some_and(|t| tags.contains(&t.trim()));

    if kind.is_integer() || tagged(INTEGER_TAGS) {
        Some(Bucket::Int)
    } else if kind == NativeKind::Float64 || tagged(FLOAT_TAGS) {
        Some(Bucket::Float)
    } else if kind == NativeKind::Category || tagged(CATEGORY_TAGS) {
        Some(Bucket::Category)
    } else if matches!(kind, NativeKind::Object | NativeKind::Category) || tagged(OTHER_TAGS) {
        Some(Bucket::Other)
    } else if kind == NativeKind::DateTime {
        Some(Bucket::Time)
    } else {
        None
    }
}
