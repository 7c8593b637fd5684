//! CSV/TSV parser with delimiter, quote and column kind detection.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::warn;

use super::source::{Column, NativeKind, SourceMetadata, Table, Value};
use crate::error::{EdaError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Quote characters to try when auto-detecting.
const QUOTES: &[u8] = &[b'"', b'\''];

// Cheap prefilter before handing a cell to chrono.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(), // ISO date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(), // Alt ISO
    ]
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character (None = auto-detect).
    pub quote: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Detect ISO date/datetime columns.
    pub parse_dates: bool,
    /// Declared storage kinds by column name; other columns are inferred.
    pub dtypes: IndexMap<String, NativeKind>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: None,
            has_header: true,
            max_rows: None,
            parse_dates: true,
            dtypes: IndexMap::new(),
        }
    }
}

/// Parses delimited text files into a [`Table`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| EdaError::io(path, e))?;
        let size_bytes = file.metadata().map_err(|e| EdaError::io(path, e))?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| EdaError::io(path, e))?;

        let hash = content_hash(&contents);

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };
        let quote = match self.config.quote {
            Some(q) => q,
            None => detect_quote(&contents, delimiter),
        };

        let table = self.parse_bytes(&contents, delimiter, quote)?;

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            delimiter,
            quote,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, source_metadata))
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8, quote: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            dedupe_headers(reader.headers()?.iter().map(|s| s.to_string()).collect())
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            if headers.is_empty() {
                headers = (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect();
            }

            // Short rows are padded with missing cells; long rows would lose data.
            if record.len() > headers.len() {
                return Err(EdaError::Parse {
                    row: row_idx,
                    column: headers.len(),
                    message: format!(
                        "expected {} fields, found {}",
                        headers.len(),
                        record.len()
                    ),
                });
            }
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        if headers.is_empty() {
            return Err(EdaError::EmptyData("No columns found".to_string()));
        }

        let mut columns = Vec::with_capacity(headers.len());
        for (col_idx, name) in headers.iter().enumerate() {
            let raw: Vec<&str> = rows.iter().map(|r| r[col_idx].as_str()).collect();
            let kind = match self.config.dtypes.get(name) {
                Some(kind) => *kind,
                None => infer_kind(&raw, self.config.parse_dates),
            };
            let values = convert_values(&raw, kind, col_idx)?;
            columns.push(Column::new(name.clone(), kind, values));
        }

        Table::new(columns)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Rename repeated header names to `name.1`, `name.2`, ... so every column
/// stays addressable.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut renamed = Vec::with_capacity(headers.len());

    for name in headers {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        if candidate != name {
            warn!(column = %name, renamed = %candidate, "duplicate column name");
        }
        seen.insert(candidate.clone());
        renamed.push(candidate);
    }

    renamed
}

/// SHA-256 of raw file contents, prefixed with the algorithm name.
pub fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("sha256:{:x}", hasher.finalize())
}

/// Decide the storage kind of a column from its raw cells.
fn infer_kind(raw: &[&str], parse_dates: bool) -> NativeKind {
    let present: Vec<&str> = raw
        .iter()
        .filter(|v| !Table::is_null_value(v))
        .map(|v| v.trim())
        .collect();
    let has_missing = present.len() < raw.len();

    if present.is_empty() {
        // An all-missing column is stored as floats full of NaN.
        return if raw.is_empty() {
            NativeKind::Object
        } else {
            NativeKind::Float64
        };
    }

    if !has_missing && present.iter().all(|v| v.parse::<i64>().is_ok()) {
        return NativeKind::Int64;
    }
    if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        return NativeKind::Float64;
    }
    if !has_missing && present.iter().all(|v| parse_bool(v).is_some()) {
        return NativeKind::Bool;
    }
    if parse_dates && present.iter().all(|v| parse_datetime(v).is_some()) {
        return NativeKind::DateTime;
    }

    NativeKind::Object
}

fn convert_values(raw: &[&str], kind: NativeKind, column: usize) -> Result<Vec<Value>> {
    raw.iter()
        .enumerate()
        .map(|(row, cell)| {
            convert_cell(cell, kind).map_err(|message| EdaError::Parse {
                row,
                column,
                message,
            })
        })
        .collect()
}

fn convert_cell(cell: &str, kind: NativeKind) -> std::result::Result<Value, String> {
    if Table::is_null_value(cell) {
        return Ok(Value::Missing);
    }
    let trimmed = cell.trim();

    match kind {
        NativeKind::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("'{}' is not an integer", trimmed)),
        NativeKind::UInt8 => trimmed
            .parse::<u8>()
            .map(|v| Value::Int(i64::from(v)))
            .map_err(|_| format!("'{}' is not an unsigned 8-bit integer", trimmed)),
        NativeKind::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("'{}' is not a number", trimmed)),
        NativeKind::Bool => parse_bool(trimmed)
            .map(Value::Bool)
            .ok_or_else(|| format!("'{}' is not a boolean", trimmed)),
        NativeKind::DateTime => parse_datetime(trimmed)
            .map(Value::DateTime)
            .ok_or_else(|| format!("'{}' is not a date", trimmed)),
        NativeKind::Object | NativeKind::Category | NativeKind::Other => {
            Ok(Value::Text(cell.to_string()))
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse an ISO-like date or datetime. Dates become midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if !DATE_PATTERNS.iter().any(|pattern| pattern.is_match(value)) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Detect the delimiter by analyzing the first few lines.
pub fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines = sample_lines(bytes);

    if lines.is_empty() {
        return Err(EdaError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a slight bonus.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Detect the quote character: the candidate that most often opens a field.
pub fn detect_quote(bytes: &[u8], delimiter: u8) -> u8 {
    let lines = sample_lines(bytes);
    let mut best_quote = b'"';
    let mut best_count = 0;

    for &quote in QUOTES {
        let count: usize = lines
            .iter()
            .map(|line| count_field_openers(line, delimiter, quote))
            .sum();
        if count > best_count {
            best_count = count;
            best_quote = quote;
        }
    }

    best_quote
}

fn sample_lines(bytes: &[u8]) -> Vec<String> {
    BufReader::new(bytes)
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect()
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

fn count_field_openers(line: &str, delimiter: u8, quote: u8) -> usize {
    let bytes = line.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|&(idx, &b)| b == quote && (idx == 0 || bytes[idx - 1] == delimiter))
        .count()
}
