//! The types document: a human-editable YAML record of a CSV's dialect and
//! the classified type of each column.
//!
//! ```yaml
//! csv_meta:
//!   delimiter: ','
//!   quotechar: '"'
//!   hash: sha256:...
//! columns:
//! - name: country
//!   type: text
//!   dtype: object
//!   examples: [Germany, France, Spain]
//! ```

mod persistence;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EdaError, Result};
use crate::input::{NativeKind, SourceMetadata};
use crate::schema::{ColumnReport, DisplayValue, OverrideMap};

pub use persistence::load_csv;

/// Dialect and fingerprint of the CSV file a document describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvMeta {
    pub delimiter: String,
    pub quotechar: String,
    /// Content hash at the time the document was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl CsvMeta {
    pub fn from_source(source: &SourceMetadata) -> Self {
        Self {
            delimiter: source.delimiter.to_string(),
            quotechar: source.quote.to_string(),
            hash: Some(source.hash.clone()),
        }
    }

    /// Delimiter as a single byte.
    pub fn delimiter_byte(&self) -> Result<u8> {
        single_byte("delimiter", &self.delimiter)
    }

    /// Quote character as a single byte.
    pub fn quote_byte(&self) -> Result<u8> {
        single_byte("quotechar", &self.quotechar)
    }
}

fn single_byte(field: &str, value: &str) -> Result<u8> {
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(EdaError::Config(format!(
            "csv_meta.{} must be a single ASCII character, got '{}'",
            field, value
        ))),
    }
}

/// One column entry. Every field except `name` may be removed by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,
    #[serde(default)]
    pub examples: Vec<DisplayValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl From<ColumnReport> for ColumnRecord {
    fn from(report: ColumnReport) -> Self {
        Self {
            name: report.name,
            column_type: Some(report.inferred_type.label().to_string()),
            dtype: Some(report.dtype.dtype().to_string()),
            examples: report.examples,
            min: report.min,
            max: report.max,
        }
    }
}

/// A persisted types document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypesDocument {
    pub csv_meta: CsvMeta,
    pub columns: Vec<ColumnRecord>,
}

impl TypesDocument {
    /// Build a document from classification results.
    pub fn new(csv_meta: CsvMeta, reports: Vec<ColumnReport>) -> Self {
        Self {
            csv_meta,
            columns: reports.into_iter().map(ColumnRecord::from).collect(),
        }
    }

    /// Override tags for the summarizer: `type` when present, else `dtype`.
    /// Columns with neither are left out.
    pub fn overrides(&self) -> OverrideMap {
        self.columns
            .iter()
            .filter_map(|c| {
                c.column_type
                    .as_ref()
                    .or(c.dtype.as_ref())
                    .map(|tag| (c.name.clone(), tag.clone()))
            })
            .collect()
    }

    /// Storage kinds declared through `dtype`, for typed loading.
    ///
    /// Fails on a dtype string that is not understood.
    pub fn declared_dtypes(&self) -> Result<IndexMap<String, NativeKind>> {
        self.columns
            .iter()
            .filter_map(|c| c.dtype.as_ref().map(|d| (c, d)))
            .map(|(c, dtype)| {
                NativeKind::from_dtype(dtype)
                    .map(|kind| (c.name.clone(), kind))
                    .ok_or_else(|| {
                        EdaError::Config(format!(
                            "Unknown dtype '{}' for column '{}'",
                            dtype, c.name
                        ))
                    })
            })
            .collect()
    }

    /// Whether the recorded hash differs from `hash`. Documents without a
    /// hash never mismatch.
    pub fn hash_mismatch(&self, hash: &str) -> bool {
        self.csv_meta.hash.as_deref().is_some_and(|h| h != hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Hypothesis;

    fn document() -> TypesDocument {
        TypesDocument {
            csv_meta: CsvMeta {
                delimiter: ";".to_string(),
                quotechar: "\"".to_string(),
                hash: Some("sha256:abc".to_string()),
            },
            columns: vec![
                ColumnRecord {
                    name: "a".to_string(),
                    column_type: Some("int".to_string()),
                    dtype: Some("int64".to_string()),
                    examples: Vec::new(),
                    min: Some(1.0),
                    max: Some(4.0),
                },
                ColumnRecord {
                    name: "b".to_string(),
                    column_type: None,
                    dtype: Some("category".to_string()),
                    examples: Vec::new(),
                    min: None,
                    max: None,
                },
                ColumnRecord {
                    name: "c".to_string(),
                    column_type: None,
                    dtype: None,
                    examples: Vec::new(),
                    min: None,
                    max: None,
                },
            ],
        }
    }

    #[test]
    fn test_overrides_prefer_type() {
        let overrides = document().overrides();

        assert_eq!(overrides.get("a").map(String::as_str), Some("int"));
        assert_eq!(overrides.get("b").map(String::as_str), Some("category"));
        assert!(!overrides.contains_key("c"));
    }

    #[test]
    fn test_declared_dtypes() {
        let dtypes = document().declared_dtypes().unwrap();

        assert_eq!(dtypes.get("a"), Some(&NativeKind::Int64));
        assert_eq!(dtypes.get("b"), Some(&NativeKind::Category));
        assert_eq!(dtypes.len(), 2);
    }

    #[test]
    fn test_unknown_dtype_is_config_error() {
        let mut doc = document();
        doc.columns[0].dtype = Some("complex128".to_string());

        assert!(matches!(doc.declared_dtypes(), Err(EdaError::Config(_))));
    }

    #[test]
    fn test_delimiter_byte() {
        let doc = document();
        assert_eq!(doc.csv_meta.delimiter_byte().unwrap(), b';');

        let meta = CsvMeta {
            delimiter: "::".to_string(),
            ..doc.csv_meta
        };
        assert!(meta.delimiter_byte().is_err());
    }

    #[test]
    fn test_hash_mismatch() {
        let mut doc = document();
        assert!(!doc.hash_mismatch("sha256:abc"));
        assert!(doc.hash_mismatch("sha256:def"));

        doc.csv_meta.hash = None;
        assert!(!doc.hash_mismatch("sha256:def"));
    }

    #[test]
    fn test_record_from_report() {
        let report = ColumnReport {
            name: "population".to_string(),
            inferred_type: Hypothesis::Float,
            dtype: NativeKind::Float64,
            examples: Vec::new(),
            min: Some(1.0),
            max: Some(2.0),
        };
        let record = ColumnRecord::from(report);

        assert_eq!(record.column_type.as_deref(), Some("float"));
        assert_eq!(record.dtype.as_deref(), Some("float64"));
    }
}
