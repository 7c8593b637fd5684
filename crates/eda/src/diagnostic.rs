//! Non-fatal findings reported while summarizing a table.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Neither storage kind nor override matched a bucket; the column is skipped.
    UnrecognizedColumnKind,
    /// Few distinct values in a column not declared as categorical.
    LowCardinality,
}

impl DiagnosticKind {
    /// Get a human-readable label for the kind.
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::UnrecognizedColumnKind => "Unrecognized Column Kind",
            DiagnosticKind::LowCardinality => "Low Cardinality",
        }
    }
}

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advice only.
    Info,
    /// Something was left out of the result.
    Warning,
}

/// A finding about one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Affected column name.
    pub column: String,
    /// Human-readable description.
    pub description: String,
}

impl Diagnostic {
    /// The column's storage kind is not handled by any bucket.
    pub fn unrecognized_kind(column: impl Into<String>, dtype: &str) -> Self {
        let column = column.into();
        Self {
            kind: DiagnosticKind::UnrecognizedColumnKind,
            severity: Severity::Warning,
            description: format!("Unknown dtype '{}' for column '{}'", dtype, column),
            column,
        }
    }

    /// The column might be better declared as a category.
    pub fn low_cardinality(column: impl Into<String>, value_count: usize, values: &str) -> Self {
        let column = column.into();
        Self {
            kind: DiagnosticKind::LowCardinality,
            severity: Severity::Info,
            description: format!(
                "Column '{}' has only {} different values ({}). You might want to make it a 'category'",
                column, value_count, values
            ),
            column,
        }
    }

    /// Write the diagnostic to the log at its severity.
    pub fn log(&self) {
        match self.severity {
            Severity::Info => info!(column = %self.column, kind = self.kind.label(), "{}", self.description),
            Severity::Warning => warn!(column = %self.column, kind = self.kind.label(), "{}", self.description),
        }
    }
}
