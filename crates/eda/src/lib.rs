//! eda: exploratory data analysis for CSV, PDF and image files.
//!
//! The core of the crate is column type inference for tabular data. Each
//! column is scored against a fixed set of semantic types, the most likely
//! type is recorded in a human-editable types document, and the column
//! summarizer uses those types to group columns and print statistics.
//!
//! # Core Principles
//!
//! - **Heuristic**: Types come from value shape, cardinality, storage kind and column name
//! - **Editable**: The types document is plain YAML and later runs respect hand edits
//! - **Non-fatal**: Problems with one column never abort a table
//!
//! # Example
//!
//! ```no_run
//! use eda::CsvExplorer;
//!
//! let explorer = CsvExplorer::new();
//! let prediction = explorer.predict("cities.csv", "cities.types.yaml").unwrap();
//!
//! println!("{}", prediction.summary);
//! for (name, bucket) in prediction.summary.column_types() {
//!     println!("{name}: {bucket}");
//! }
//! ```

pub mod collect;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod inference;
pub mod input;
pub mod schema;
pub mod summary;

mod explorer;

pub use crate::explorer::{CsvExplorer, ExplorerConfig, Prediction};
pub use config::CollectorConfig;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use document::{load_csv, TypesDocument};
pub use error::{EdaError, Result};
pub use inference::{classify, type_probabilities};
pub use input::{Column, NativeKind, SourceMetadata, Table, Value};
pub use schema::{Bucket, ColumnReport, Hypothesis, OverrideMap};
pub use summary::{summarize, Summary};
