//! Collector configuration.
//!
//! Loaded from `~/.eda/config.yaml`. The file is created from built-in
//! defaults the first time it is needed so that it can be edited afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EdaError, Result};

const DEFAULT_CONFIG: &str = include_str!("../config/default.yaml");

/// Settings for the PDF collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Document info keys written as columns.
    #[serde(default)]
    pub keys: Vec<String>,
    /// Document info keys dropped without logging.
    #[serde(default)]
    pub ignore_keys: Vec<String>,
    /// Upper bound for a single `pdfinfo`/`pdftotext` call.
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,
}

fn default_tool_timeout() -> u64 {
    30
}

/// Settings for the image collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Lowercase extensions without the dot.
    #[serde(default)]
    pub file_extensions: Vec<String>,
    /// EXIF keys written as columns.
    #[serde(default)]
    pub keys: Vec<String>,
    /// EXIF keys dropped without logging.
    #[serde(default)]
    pub ignore_keys: Vec<String>,
}

impl ImagesConfig {
    /// Whether a path has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.file_extensions.iter().any(|e| *e == ext))
    }
}

/// Configuration shared by the file collectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub pdf: PdfConfig,
    pub images: ImagesConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        // The embedded defaults are covered by a unit test.
        serde_yaml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            pdf: PdfConfig {
                keys: Vec::new(),
                ignore_keys: Vec::new(),
                tool_timeout_secs: default_tool_timeout(),
            },
            images: ImagesConfig {
                file_extensions: vec!["jpg".to_string(), "png".to_string()],
                keys: Vec::new(),
                ignore_keys: Vec::new(),
            },
        })
    }
}

impl CollectorConfig {
    /// Default location, `~/.eda/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".eda").join("config.yaml"))
    }

    /// Load from the default location, writing the defaults there first if
    /// the file does not exist yet. Falls back to the built-in defaults when
    /// there is no home directory.
    pub fn load_or_init() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_or_init_at(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`, bootstrapping it from the defaults when missing.
    pub fn load_or_init_at(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| EdaError::io(parent, e))?;
            }
            fs::write(path, DEFAULT_CONFIG).map_err(|e| EdaError::io(path, e))?;
            info!(path = %path.display(), "created collector configuration");
        }
        Self::load(path)
    }

    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| EdaError::io(path, e))?;
        serde_yaml::from_str(&contents).map_err(|e| {
            EdaError::Config(format!("Invalid configuration '{}': {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let config: CollectorConfig = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();

        assert!(config.pdf.keys.contains(&"Author".to_string()));
        assert_eq!(config.pdf.tool_timeout_secs, 30);
        assert!(config.images.file_extensions.contains(&"jpg".to_string()));
        assert_eq!(CollectorConfig::default(), config);
    }

    #[test]
    fn test_bootstrap_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".eda").join("config.yaml");

        let config = CollectorConfig::load_or_init_at(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config, CollectorConfig::default());
    }

    #[test]
    fn test_user_edits_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "pdf:\n  keys: [Title]\nimages:\n  file_extensions: [gif]\n",
        )
        .unwrap();

        let config = CollectorConfig::load_or_init_at(&path).unwrap();

        assert_eq!(config.pdf.keys, vec!["Title".to_string()]);
        assert_eq!(config.pdf.tool_timeout_secs, 30);
        assert!(config.images.matches(Path::new("a/B.GIF")));
        assert!(!config.images.matches(Path::new("a/b.jpg")));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "pdf: [1, 2").unwrap();

        assert!(matches!(
            CollectorConfig::load(&path),
            Err(EdaError::Config(_))
        ));
    }
}
