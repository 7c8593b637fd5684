//! Error types for the eda library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for eda operations.
#[derive(Debug, Error)]
pub enum EdaError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cell could not be read as the declared column type.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An external tool (pdfinfo, pdftotext) failed or timed out.
    #[error("{tool} failed for '{path}': {message}")]
    ExternalTool {
        tool: String,
        path: PathBuf,
        message: String,
    },

    /// Image could not be decoded.
    #[error("Image error for '{path}': {message}")]
    Image { path: PathBuf, message: String },
}

impl EdaError {
    /// Wrap an IO error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EdaError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for eda operations.
pub type Result<T> = std::result::Result<T, EdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_location() {
        let parse = EdaError::Parse {
            row: 3,
            column: 1,
            message: "expected 1 fields, found 2".to_string(),
        };
        assert_eq!(
            parse.to_string(),
            "Parse error at row 3, column 1: expected 1 fields, found 2"
        );

        let io = EdaError::io(
            "data.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(io.to_string(), "IO error for 'data.csv': missing");
    }
}
