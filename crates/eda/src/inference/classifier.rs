//! Column classification: semantic type, examples and numeric range.

use tracing::debug;

use crate::input::{Column, Table};
use crate::schema::{coerce_for_display, ColumnReport, Hypothesis, OverrideMap};

use super::scorer::type_probabilities;

/// Configuration for the column classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Number of most frequent values kept as examples.
    pub example_count: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { example_count: 3 }
    }
}

/// Classifies every column of a table.
pub struct ColumnClassifier {
    config: ClassifierConfig,
}

impl ColumnClassifier {
    /// Create a classifier with default settings.
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// One report per column, in table order.
    pub fn classify(&self, table: &Table, overrides: &OverrideMap) -> Vec<ColumnReport> {
        table
            .columns()
            .iter()
            .map(|column| {
                let override_type = overrides.get(&column.name).map(String::as_str);
                self.classify_column(column, override_type)
            })
            .collect()
    }

    /// Classify a single column.
    pub fn classify_column(&self, column: &Column, override_type: Option<&str>) -> ColumnReport {
        let examples = column
            .value_counts()
            .into_iter()
            .take(self.config.example_count)
            .map(|(value, _)| coerce_for_display(&value, column.kind))
            .collect();

        let probabilities = type_probabilities(column, &column.name, override_type);
        // The scorer always covers every hypothesis, so argmax is never empty.
        let inferred_type = probabilities.argmax().copied().unwrap_or(Hypothesis::Text);

        let (min, max) = if column.kind.is_numeric() {
            numeric_range(column)
        } else {
            (None, None)
        };

        debug!(
            column = %column.name,
            dtype = %column.kind,
            inferred = %inferred_type,
            "classified column"
        );

        ColumnReport {
            name: column.name.clone(),
            inferred_type,
            dtype: column.kind,
            examples,
            min,
            max,
        }
    }
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a table with the default configuration.
pub fn classify(table: &Table, overrides: &OverrideMap) -> Vec<ColumnReport> {
    ColumnClassifier::new().classify(table, overrides)
}

fn numeric_range(column: &Column) -> (Option<f64>, Option<f64>) {
    column
        .numeric_values()
        .into_iter()
        .fold((None, None), |(min, max), v| {
            (
                Some(min.map_or(v, |m: f64| m.min(v))),
                Some(max.map_or(v, |m: f64| m.max(v))),
            )
        })
}
