//! Descriptive statistics for summarized columns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::input::{Column, Value};

// =============================================================================
// RUNNING MOMENTS
// =============================================================================
// Welford's online algorithm for mean and variance in a single pass.

#[derive(Debug, Clone, Default)]
struct RunningMoments {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
}

impl RunningMoments {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Sample standard deviation; undefined below two values.
    fn sample_std(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some((self.m2 / (self.count - 1) as f64).sqrt())
        }
    }
}

/// Statistics for int and float buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: f64,
    /// Sample standard deviation; `None` for a single value.
    pub std: Option<f64>,
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Summarize values; `None` when there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut moments = RunningMoments::default();
        for &value in values {
            moments.add(value);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            mean: moments.mean,
            std: moments.sample_std(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Quantile of sorted, non-empty data with linear interpolation between the
/// two nearest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Most frequent value of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
}

/// Statistics for category and other buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    /// Number of distinct non-missing values.
    pub unique: usize,
    /// Absent when the column has no values.
    pub top: Option<TopValue>,
    /// Truncated rendering of the remaining values, most frequent first.
    pub rest: String,
}

impl CategoricalSummary {
    /// Build from a value list ordered by descending frequency.
    pub fn from_value_counts(counts: &[(Value, usize)], preview_chars: usize) -> Self {
        let top = counts.first().map(|(value, count)| TopValue {
            value: value.to_string(),
            count: *count,
        });
        let rest: Vec<&Value> = counts.iter().skip(1).map(|(value, _)| value).collect();

        Self {
            unique: counts.len(),
            top,
            rest: preview(&rest, preview_chars),
        }
    }
}

/// Statistics for the time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSummary {
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,
}

impl TimeSummary {
    pub fn from_column(column: &Column) -> Self {
        let timestamps = column.non_missing().filter_map(|v| match v {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        });
        let (earliest, latest) = timestamps.fold((None, None), |(lo, hi), dt| {
            (
                Some(lo.map_or(dt, |l: NaiveDateTime| l.min(dt))),
                Some(hi.map_or(dt, |h: NaiveDateTime| h.max(dt))),
            )
        });
        Self { earliest, latest }
    }
}

/// Statistics of a column, by bucket family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStatistics {
    Numeric {
        /// Values with a numeric reading.
        non_missing: usize,
        /// Absent when there are no numeric values.
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<NumericSummary>,
    },
    Categorical {
        non_missing: usize,
        #[serde(flatten)]
        summary: CategoricalSummary,
    },
    Time {
        non_missing: usize,
        #[serde(flatten)]
        summary: TimeSummary,
    },
}

impl ColumnStatistics {
    /// Number of non-missing values.
    pub fn non_missing(&self) -> usize {
        match self {
            ColumnStatistics::Numeric { non_missing, .. }
            | ColumnStatistics::Categorical { non_missing, .. }
            | ColumnStatistics::Time { non_missing, .. } => *non_missing,
        }
    }
}

/// Render values as a list and cut it to `max_chars` characters.
pub fn preview(values: &[&Value], max_chars: usize) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|value| match value {
            Value::Text(s) => format!("'{}'", s),
            other => other.to_string(),
        })
        .collect();
    format!("[{}]", items.join(", "))
        .chars()
        .take(max_chars)
        .collect()
}
