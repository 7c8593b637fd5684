//! Plain-text rendering of a [`Summary`].

use std::fmt;

use crate::schema::Bucket;

use super::statistics::{ColumnStatistics, NumericSummary};
use super::summarizer::{ColumnSummary, Summary};

const NAME_HEADER: &str = "Column name";

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.name_width;
        writeln!(f, "Number of datapoints: {}", self.datapoints)?;

        writeln!(f, "\n## {}", Bucket::Int.title())?;
        writeln!(
            f,
            "{:<width$}: Non-nan  mean   std   min   25%   50%   75%   max",
            NAME_HEADER
        )?;
        for column in self.bucket(Bucket::Int) {
            write_numeric_row(f, column, width, 0)?;
        }

        writeln!(f, "\n## {}", Bucket::Float.title())?;
        writeln!(
            f,
            "{:<width$}: Non-nan   mean    std    min    25%    50%    75%    max",
            NAME_HEADER
        )?;
        for column in self.bucket(Bucket::Float) {
            write_numeric_row(f, column, width, 2)?;
        }

        if self.bucket(Bucket::Category).next().is_some() {
            writeln!(f, "\n## {}", Bucket::Category.title())?;
            writeln!(
                f,
                "{:<width$}: Non-nan   unique   top (count)  rest",
                NAME_HEADER
            )?;
            for column in self.bucket(Bucket::Category) {
                write_categorical_row(f, column, width)?;
            }
        }

        writeln!(f, "\n## {}", Bucket::Other.title())?;
        writeln!(
            f,
            "{:<width$}: Non-nan   unique   top (count)  rest",
            NAME_HEADER
        )?;
        for column in self.bucket(Bucket::Other) {
            write_categorical_row(f, column, width)?;
        }

        if self.bucket(Bucket::Time).next().is_some() {
            writeln!(f, "\n## {}", Bucket::Time.title())?;
            writeln!(f, "{:<width$}: Non-nan   earliest              latest", NAME_HEADER)?;
            for column in self.bucket(Bucket::Time) {
                if let ColumnStatistics::Time { non_missing, summary } = &column.statistics {
                    let stamp = |t: Option<chrono::NaiveDateTime>| {
                        t.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                            .unwrap_or_else(|| "-".to_string())
                    };
                    writeln!(
                        f,
                        "{:<width$}: {:>7}   {:<19}   {}",
                        column.name,
                        non_missing,
                        stamp(summary.earliest),
                        stamp(summary.latest)
                    )?;
                }
            }
        }

        Ok(())
    }
}

fn write_numeric_row(
    f: &mut fmt::Formatter<'_>,
    column: &ColumnSummary,
    width: usize,
    precision: usize,
) -> fmt::Result {
    let ColumnStatistics::Numeric { non_missing, summary } = &column.statistics else {
        return Ok(());
    };
    write!(f, "{:<width$}: {:>7}  ", column.name, non_missing)?;

    let Some(NumericSummary {
        mean,
        std,
        min,
        q1,
        median,
        q3,
        max,
    }) = summary
    else {
        return writeln!(f, "-");
    };

    // Integer rows print quantiles without decimals, float rows with two.
    let cell = precision + if precision > 0 { 3 } else { 4 };
    let std = std.map_or_else(|| "nan".to_string(), |s| format!("{:.2}", s));
    writeln!(
        f,
        "{:>mw$.2}  {:>4}  {:>cell$.precision$}  {:>cell$.precision$}  {:>cell$.precision$}  {:>cell$.precision$}  {:>cell$.precision$}",
        mean,
        std,
        min,
        q1,
        median,
        q3,
        max,
        mw = if precision > 0 { 5 } else { 0 },
    )
}

fn write_categorical_row(
    f: &mut fmt::Formatter<'_>,
    column: &ColumnSummary,
    width: usize,
) -> fmt::Result {
    let ColumnStatistics::Categorical { non_missing, summary } = &column.statistics else {
        return Ok(());
    };
    write!(f, "{:<width$}: {:>7}   {:>6}   ", column.name, non_missing, summary.unique)?;
    match &summary.top {
        Some(top) => write!(f, "{} ({})", top.value, top.count)?,
        None => write!(f, "- (0)")?,
    }
    writeln!(f, "  {}", summary.rest)
}
