//! Semantic types and summary buckets.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Caller-supplied column name to type/dtype tag, e.g. `"int64"` or `"category"`.
pub type OverrideMap = IndexMap<String, String>;

/// Semantic type a column may be classified as.
///
/// The declaration order is the enumeration order used to break ties when
/// selecting the most likely type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hypothesis {
    /// Whole numbers.
    Int,
    /// Real numbers.
    Float,
    /// Values from a small, fixed set.
    Category,
    /// Dates and timestamps.
    Date,
    /// Two-valued data.
    Bool,
    /// Free text.
    Text,
    /// Row identifiers.
    Identifier,
}

impl Hypothesis {
    /// Every hypothesis in enumeration order.
    pub const ALL: [Hypothesis; 7] = [
        Hypothesis::Int,
        Hypothesis::Float,
        Hypothesis::Category,
        Hypothesis::Date,
        Hypothesis::Bool,
        Hypothesis::Text,
        Hypothesis::Identifier,
    ];

    /// Lowercase label as written to the types document.
    pub fn label(&self) -> &'static str {
        match self {
            Hypothesis::Int => "int",
            Hypothesis::Float => "float",
            Hypothesis::Category => "category",
            Hypothesis::Date => "date",
            Hypothesis::Bool => "bool",
            Hypothesis::Text => "text",
            Hypothesis::Identifier => "identifier",
        }
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Hypothesis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hypothesis::ALL
            .iter()
            .find(|h| h.label() == s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown type: {}", s))
    }
}

/// Coarse grouping used for the statistics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Int,
    Float,
    Category,
    /// General text; reported as `str` in the returned type map.
    Other,
    Time,
}

impl Bucket {
    /// Buckets in report order.
    pub const ALL: [Bucket; 5] = [
        Bucket::Int,
        Bucket::Float,
        Bucket::Category,
        Bucket::Other,
        Bucket::Time,
    ];

    /// Literal bucket name.
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Int => "int",
            Bucket::Float => "float",
            Bucket::Category => "category",
            Bucket::Other => "other",
            Bucket::Time => "time",
        }
    }

    /// Type name handed back to callers.
    pub fn type_name(&self) -> &'static str {
        match self {
            Bucket::Other => "str",
            other => other.label(),
        }
    }

    /// Section header used in the printed report.
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Int => "Integer Columns",
            Bucket::Float => "Float Columns",
            Bucket::Category => "Category Columns",
            Bucket::Other => "Other Columns",
            Bucket::Time => "Time Columns",
        }
    }

    /// Whether the bucket gets numeric statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Bucket::Int | Bucket::Float)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hypothesis_from_str() {
        assert_eq!("identifier".parse::<Hypothesis>(), Ok(Hypothesis::Identifier));
        assert!("int64".parse::<Hypothesis>().is_err());
    }

    #[test]
    fn test_other_bucket_is_str() {
        assert_eq!(Bucket::Other.type_name(), "str");
        assert_eq!(Bucket::Other.label(), "other");
        assert_eq!(Bucket::Time.type_name(), "time");
    }
}
