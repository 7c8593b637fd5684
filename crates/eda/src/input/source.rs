//! In-memory table model and source metadata.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EdaError, Result};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Field delimiter used while parsing.
    pub delimiter: char,
    /// Quote character used while parsing.
    pub quote: char,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been parsed.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        delimiter: u8,
        quote: u8,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            delimiter: delimiter as char,
            quote: quote as char,
            row_count,
            column_count,
            analyzed_at: Utc::now(),
        }
    }
}

/// Physical storage kind of a column, named after the dtype strings that end
/// up in the types document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeKind {
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "uint8")]
    UInt8,
    #[serde(rename = "float64")]
    Float64,
    #[serde(rename = "bool")]
    Bool,
    /// General text.
    #[serde(rename = "object")]
    Object,
    /// Text declared as categorical.
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "datetime64[ns]")]
    DateTime,
    /// Anything else, e.g. mixed values.
    #[serde(rename = "other")]
    Other,
}

impl NativeKind {
    /// The dtype string for this kind.
    pub fn dtype(&self) -> &'static str {
        match self {
            NativeKind::Int64 => "int64",
            NativeKind::UInt8 => "uint8",
            NativeKind::Float64 => "float64",
            NativeKind::Bool => "bool",
            NativeKind::Object => "object",
            NativeKind::Category => "category",
            NativeKind::DateTime => "datetime64[ns]",
            NativeKind::Other => "other",
        }
    }

    /// Parse a dtype string as written in a types document.
    pub fn from_dtype(dtype: &str) -> Option<Self> {
        match dtype.trim() {
            "int64" => Some(NativeKind::Int64),
            "uint8" => Some(NativeKind::UInt8),
            "float64" => Some(NativeKind::Float64),
            "bool" => Some(NativeKind::Bool),
            "object" => Some(NativeKind::Object),
            "category" => Some(NativeKind::Category),
            "datetime64[ns]" | "datetime64" => Some(NativeKind::DateTime),
            "other" => Some(NativeKind::Other),
            _ => None,
        }
    }

    /// Returns true for integer and floating-point storage.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            NativeKind::Int64 | NativeKind::UInt8 | NativeKind::Float64
        )
    }

    /// Returns true for integer storage.
    pub fn is_integer(&self) -> bool {
        matches!(self, NativeKind::Int64 | NativeKind::UInt8)
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dtype())
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Missing markers and NaN floats are both missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            _ => None,
        }
    }

    fn key(&self) -> ValueKey {
        match self {
            Value::Missing => ValueKey::Missing,
            Value::Int(v) => ValueKey::Int(*v),
            // -0.0 and 0.0 count as the same value
            Value::Float(v) => ValueKey::Float((*v + 0.0).to_bits()),
            Value::Bool(v) => ValueKey::Bool(*v),
            Value::Text(s) => ValueKey::Text(s.clone()),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("NA"),
            Value::Int(v) => write!(f, "{}", v),
            // Debug keeps the trailing ".0" on whole floats
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueKey {
    Missing,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

/// A named column of values with a single storage kind.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: NativeKind,
    pub values: Vec<Value>,
}

impl Column {
    /// Create a column.
    pub fn new(name: impl Into<String>, kind: NativeKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Integer column.
    pub fn from_i64(name: impl Into<String>, values: &[i64]) -> Self {
        Self::new(
            name,
            NativeKind::Int64,
            values.iter().map(|v| Value::Int(*v)).collect(),
        )
    }

    /// Float column; `None` entries are missing.
    pub fn from_f64(name: impl Into<String>, values: &[Option<f64>]) -> Self {
        Self::new(
            name,
            NativeKind::Float64,
            values
                .iter()
                .map(|v| v.map(Value::Float).unwrap_or(Value::Missing))
                .collect(),
        )
    }

    /// Text column; `None` entries are missing.
    pub fn from_strs(name: impl Into<String>, values: &[Option<&str>]) -> Self {
        Self::new(
            name,
            NativeKind::Object,
            values
                .iter()
                .map(|v| v.map(|s| Value::Text(s.to_string())).unwrap_or(Value::Missing))
                .collect(),
        )
    }

    /// Boolean column.
    pub fn from_bools(name: impl Into<String>, values: &[bool]) -> Self {
        Self::new(
            name,
            NativeKind::Bool,
            values.iter().map(|v| Value::Bool(*v)).collect(),
        )
    }

    /// Datetime column; `None` entries are missing.
    pub fn from_datetimes(name: impl Into<String>, values: &[Option<NaiveDateTime>]) -> Self {
        Self::new(
            name,
            NativeKind::DateTime,
            values
                .iter()
                .map(|v| v.map(Value::DateTime).unwrap_or(Value::Missing))
                .collect(),
        )
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the non-missing values.
    pub fn non_missing(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_missing())
    }

    /// Number of non-missing values.
    pub fn non_missing_count(&self) -> usize {
        self.non_missing().count()
    }

    /// Distinct non-missing values with their frequency, most frequent first.
    /// Ties keep the order of first appearance.
    pub fn value_counts(&self) -> Vec<(Value, usize)> {
        let mut counts: IndexMap<ValueKey, (Value, usize)> = IndexMap::new();
        for value in self.non_missing() {
            counts
                .entry(value.key())
                .or_insert_with(|| (value.clone(), 0))
                .1 += 1;
        }
        let mut counts: Vec<(Value, usize)> = counts.into_values().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Number of distinct non-missing values.
    pub fn distinct_count(&self) -> usize {
        self.value_counts().len()
    }

    /// Non-missing values with a numeric view.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.non_missing().filter_map(Value::as_f64).collect()
    }
}

/// Parsed tabular data, column-major.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table. All columns must have the same length and unique names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let rows = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
                return Err(EdaError::Config(format!(
                    "Column '{}' has {} values, expected {}",
                    bad.name,
                    bad.len(),
                    rows
                )));
            }
        }
        for (idx, column) in columns.iter().enumerate() {
            if columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(EdaError::Config(format!(
                    "Duplicate column name '{}'",
                    column.name
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// All columns in table order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in table order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check if a raw cell represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
    }
}
