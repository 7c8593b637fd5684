//! Heuristic type scoring for a single column.
//!
//! Each rule is an independent multiplicative adjustment applied to a uniform
//! starting distribution, in a fixed order.

use crate::input::{Column, NativeKind};
use crate::schema::Hypothesis;

use super::distribution::ScoreDistribution;

/// Largest distance from the nearest integer that still counts as whole.
pub const FRACTION_TOLERANCE: f64 = 1e-4;

// =============================================================================
// OVERRIDE VOCABULARY
// =============================================================================

const INTEGER_TAGS: &[&str] = &["int64", "uint8", "int"];
const FLOAT_TAGS: &[&str] = &["float64", "float"];
const CATEGORY_TAGS: &[&str] = &["category"];
const TEXT_TAGS: &[&str] = &["object", "str", "text"];

/// Facts about a column that the rules look at.
#[derive(Debug, Clone)]
pub struct ColumnFacts<'a> {
    /// Distinct non-missing values.
    pub distinct: usize,
    pub kind: NativeKind,
    pub has_fraction: bool,
    /// Lowercased column name.
    pub name: String,
    pub override_type: Option<&'a str>,
}

impl<'a> ColumnFacts<'a> {
    /// Gather the facts for a column.
    pub fn gather(column: &Column, column_name: &str, override_type: Option<&'a str>) -> Self {
        Self {
            distinct: column.distinct_count(),
            kind: column.kind,
            has_fraction: column.kind.is_numeric() && has_fraction(column),
            name: column_name.to_lowercase(),
            override_type,
        }
    }
}

type Rule = fn(ScoreDistribution, &ColumnFacts<'_>) -> ScoreDistribution;

const RULES: &[Rule] = &[cardinality_rule, storage_rule, name_rule, override_rule];

/// Unnormalized plausibility of every hypothesis for a column.
pub fn score(column: &Column, column_name: &str, override_type: Option<&str>) -> ScoreDistribution {
    let facts = ColumnFacts::gather(column, column_name, override_type);
    score_facts(&facts)
}

/// Run the rule pipeline over already gathered facts.
pub fn score_facts(facts: &ColumnFacts<'_>) -> ScoreDistribution {
    RULES
        .iter()
        .fold(ScoreDistribution::uniform(Hypothesis::ALL), |dist, rule| {
            rule(dist, facts)
        })
}

/// Normalized type probabilities for a column.
pub fn type_probabilities(
    column: &Column,
    column_name: &str,
    override_type: Option<&str>,
) -> ScoreDistribution {
    score(column, column_name, override_type).normalize()
}

/// Whether any non-missing value is not a whole number.
pub fn has_fraction(column: &Column) -> bool {
    column
        .non_missing()
        .filter_map(|v| v.as_f64())
        .any(|v| (v - v.round()).abs() > FRACTION_TOLERANCE)
}

/// More than two distinct values rules out a boolean.
fn cardinality_rule(dist: ScoreDistribution, facts: &ColumnFacts<'_>) -> ScoreDistribution {
    if facts.distinct > 2 {
        dist.set(Hypothesis::Bool, 0.0)
    } else {
        dist.scale(&Hypothesis::Bool, 2.0)
    }
}

fn storage_rule(dist: ScoreDistribution, facts: &ColumnFacts<'_>) -> ScoreDistribution {
    if !facts.kind.is_numeric() {
        return dist
            .set(Hypothesis::Float, 0.0)
            .set(Hypothesis::Int, 0.0);
    }

    let mut dist = dist;
    if facts.has_fraction {
        dist = dist
            .set(Hypothesis::Int, 0.0)
            .scale(&Hypothesis::Category, 0.5)
            .scale(&Hypothesis::Date, 0.5);
    }
    if facts.kind == NativeKind::Int64 {
        dist = dist.scale(&Hypothesis::Int, 2.0);
    }
    dist
}

/// Column name hints, only for non-numeric storage.
fn name_rule(dist: ScoreDistribution, facts: &ColumnFacts<'_>) -> ScoreDistribution {
    if facts.kind.is_numeric() {
        return dist;
    }

    let name = facts.name.as_str();
    let mut dist = dist;
    if name.contains("date") || name.contains("time") {
        dist = dist.scale(&Hypothesis::Date, 2.0);
    }
    if name.contains("_id") || name == "id" {
        dist = dist.scale(&Hypothesis::Identifier, 2.0);
    }
    if name.contains("description") {
        dist = dist.scale(&Hypothesis::Text, 2.0);
    }
    dist
}

fn override_rule(dist: ScoreDistribution, facts: &ColumnFacts<'_>) -> ScoreDistribution {
    let Some(tag) = facts.override_type.map(str::trim) else {
        return dist;
    };

    let favored = if INTEGER_TAGS.contains(&tag) {
        Hypothesis::Int
    } else if FLOAT_TAGS.contains(&tag) {
        Hypothesis::Float
    } else if CATEGORY_TAGS.contains(&tag) {
        Hypothesis::Category
    } else if TEXT_TAGS.contains(&tag) {
        Hypothesis::Text
    } else {
        return dist;
    };
    dist.scale(&favored, 2.0)
}
