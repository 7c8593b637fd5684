//! CSV exploration entry point: load, classify, persist and summarize.

use std::path::Path;

use tracing::{info, warn};

use crate::document::{CsvMeta, TypesDocument};
use crate::error::Result;
use crate::inference::{ClassifierConfig, ColumnClassifier};
use crate::input::{Parser, ParserConfig, SourceMetadata, Table};
use crate::schema::{ColumnReport, OverrideMap};
use crate::summary::{Summarizer, Summary, SummaryConfig};

/// Configuration for CSV exploration.
#[derive(Debug, Clone, Default)]
pub struct ExplorerConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Classifier configuration.
    pub classifier: ClassifierConfig,
    /// Summarizer configuration.
    pub summary: SummaryConfig,
}

/// Result of a predict run.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Metadata about the CSV file.
    pub source: SourceMetadata,
    /// The types document as written.
    pub document: TypesDocument,
    /// Whether the document was created by this run.
    pub created: bool,
    pub summary: Summary,
}

/// Explores CSV files.
pub struct CsvExplorer {
    parser: Parser,
    classifier: ColumnClassifier,
    summarizer: Summarizer,
}

impl CsvExplorer {
    /// Create an explorer with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExplorerConfig::default())
    }

    /// Create an explorer with custom configuration.
    pub fn with_config(config: ExplorerConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            classifier: ColumnClassifier::with_config(config.classifier),
            summarizer: Summarizer::with_config(config.summary),
        }
    }

    /// Read a CSV file with dialect and kind detection.
    pub fn load(&self, csv_path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        self.parser.parse_file(csv_path)
    }

    /// Classify every column of a CSV file.
    pub fn classify(&self, csv_path: impl AsRef<Path>) -> Result<Vec<ColumnReport>> {
        let (table, _) = self.load(csv_path)?;
        Ok(self.classifier.classify(&table, &OverrideMap::new()))
    }

    /// Summarize a CSV file without overrides.
    pub fn describe(&self, csv_path: impl AsRef<Path>) -> Result<Summary> {
        let (table, _) = self.load(csv_path)?;
        Ok(self.summarizer.summarize(&table, &OverrideMap::new()))
    }

    /// Predict column types and summarize the file.
    ///
    /// Without a types document at `types_path` the columns are classified
    /// and a new document is written; the summary then uses storage kinds
    /// only. With an existing document its types drive the summary and the
    /// document is written back unchanged.
    pub fn predict(
        &self,
        csv_path: impl AsRef<Path>,
        types_path: impl AsRef<Path>,
    ) -> Result<Prediction> {
        let csv_path = csv_path.as_ref();
        let types_path = types_path.as_ref();

        let (table, source) = self.load(csv_path)?;
        info!(
            path = %csv_path.display(),
            rows = source.row_count,
            columns = source.column_count,
            "loaded CSV"
        );

        let (document, overrides, created) = if types_path.exists() {
            let document = TypesDocument::load(types_path)?;
            if document.hash_mismatch(&source.hash) {
                warn!(
                    csv = %csv_path.display(),
                    types = %types_path.display(),
                    "CSV content changed since the types document was written"
                );
            }
            let overrides = document.overrides();
            (document, overrides, false)
        } else {
            let reports = self.classifier.classify(&table, &OverrideMap::new());
            let document = TypesDocument::new(CsvMeta::from_source(&source), reports);
            info!(path = %types_path.display(), "created types document");
            (document, OverrideMap::new(), true)
        };

        let summary = self.summarizer.summarize(&table, &overrides);
        document.save(types_path)?;

        Ok(Prediction {
            source,
            document,
            created,
            summary,
        })
    }
}

impl Default for CsvExplorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const CSV: &str = "country,population,EUR\nGermany,82521653,true\nFrance,66991000,true\nIndonesia,255461700,false\n";

    #[test]
    fn test_predict_creates_document() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("countries.csv");
        let types_path = dir.path().join("types.yaml");
        fs::write(&csv_path, CSV).unwrap();

        let prediction = CsvExplorer::new().predict(&csv_path, &types_path).unwrap();

        assert!(prediction.created);
        assert!(types_path.exists());
        assert_eq!(prediction.document.columns.len(), 3);
        assert_eq!(prediction.document.csv_meta.delimiter, ",");
        assert_eq!(prediction.summary.column_types()["population"], "int");
    }

    #[test]
    fn test_predict_reuses_document() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("countries.csv");
        let types_path = dir.path().join("types.yaml");
        fs::write(&csv_path, CSV).unwrap();

        let explorer = CsvExplorer::new();
        let first = explorer.predict(&csv_path, &types_path).unwrap();
        let second = explorer.predict(&csv_path, &types_path).unwrap();

        assert!(!second.created);
        assert_eq!(first.document, second.document);
        assert!(second
            .summary
            .diagnostics
            .iter()
            .all(|d| d.kind != crate::DiagnosticKind::LowCardinality));
    }

    #[test]
    fn test_missing_csv_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = CsvExplorer::new().predict(dir.path().join("none.csv"), dir.path().join("t.yaml"));

        assert!(result.is_err());
        assert!(!dir.path().join("t.yaml").exists());
    }
}
