//! Reading and writing types documents.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{EdaError, Result};
use crate::input::{Parser, ParserConfig, Table};

use super::TypesDocument;

impl TypesDocument {
    /// Save the document as YAML.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use eda::document::TypesDocument;
    /// # fn example(doc: &TypesDocument) -> eda::Result<()> {
    /// doc.save("cities.types.yaml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| EdaError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| EdaError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_yaml::to_writer(&mut writer, self)?;
        writer.flush().map_err(|e| EdaError::io(path, e))?;

        debug!(path = %path.display(), columns = self.columns.len(), "wrote types document");
        Ok(())
    }

    /// Load a document from YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| EdaError::io(path, e))?;
        let document: TypesDocument = serde_yaml::from_reader(BufReader::new(file))?;

        Ok(document)
    }
}

/// Load a CSV file typed by its types document.
///
/// The document's delimiter and quote character are used as-is and every
/// declared `dtype` fixes the storage kind of its column; undeclared columns
/// are inferred. A value that does not fit its declared kind is an error.
pub fn load_csv(csv_path: impl AsRef<Path>, types_path: impl AsRef<Path>) -> Result<Table> {
    let document = TypesDocument::load(types_path)?;

    let config = ParserConfig {
        delimiter: Some(document.csv_meta.delimiter_byte()?),
        quote: Some(document.csv_meta.quote_byte()?),
        dtypes: document.declared_dtypes()?,
        ..ParserConfig::default()
    };
    let (table, _) = Parser::with_config(config).parse_file(csv_path)?;

    Ok(table)
}
