//! Configuration for the document loader.
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.extensions, vec!["txt".to_string()]);
//! ```
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::IngestError;

/// Runtime configuration for [`load_documents`](crate::load_documents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory scanned (non-recursively) for documents.
    pub data_dir: PathBuf,
    /// Allowed file extensions without the dot, matched case-insensitively.
    pub extensions: Vec<String>,
    /// Upper bound on a single file's size in bytes. `None` disables the check.
    pub max_file_bytes: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            extensions: vec!["txt".to_string()],
            max_file_bytes: Some(10 * 1024 * 1024), // 10MB
        }
    }
}

impl IngestConfig {
    /// Convenience constructor using defaults for everything but the directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(IngestError::InvalidConfig("data_dir must not be empty".into()));
        }
        if self.extensions.is_empty() {
            return Err(IngestError::InvalidConfig(
                "at least one file extension is required".into(),
            ));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.trim().is_empty() || ext.starts_with('.'))
        {
            return Err(IngestError::InvalidConfig(format!(
                "extension '{bad}' must be non-empty and given without a leading dot"
            )));
        }
        if self.max_file_bytes == Some(0) {
            return Err(IngestError::InvalidConfig(
                "max_file_bytes must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
    }
}
