//! Per-column classification report.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::types::Hypothesis;
use crate::input::{NativeKind, Value};

/// Plain value suitable for a human-editable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Boolean(bool),
    Number(Number),
    Text(String),
}

/// Coerce a cell for serialization.
///
/// Booleans are checked before numbers; numbers are kept as numbers only when
/// the column is stored numerically. Everything else becomes text.
pub fn coerce_for_display(value: &Value, kind: NativeKind) -> DisplayValue {
    match value {
        Value::Bool(b) => DisplayValue::Boolean(*b),
        Value::Int(v) if kind.is_numeric() => DisplayValue::Number(Number::from(*v)),
        Value::Float(v) if kind.is_numeric() => Number::from_f64(*v)
            .map(DisplayValue::Number)
            .unwrap_or_else(|| DisplayValue::Text(value.to_string())),
        other => DisplayValue::Text(other.to_string()),
    }
}

/// Classification result for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    /// Column name.
    pub name: String,
    /// Most likely semantic type.
    #[serde(rename = "type")]
    pub inferred_type: Hypothesis,
    /// Storage kind.
    pub dtype: NativeKind,
    /// Up to three most frequent values.
    pub examples: Vec<DisplayValue>,
    /// Smallest value, numeric columns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Largest value, numeric columns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}
