//! Evidence Ingest Layer
//!
//! This is where documents enter the system. We scan one directory, read the
//! files whose extension is allowed, and hand back an ordered corpus of
//! `{content, source}` pairs for the embedding stage.
//!
//! ## What we do here
//!
//! - **Filter by extension** - Only `.txt` by default, matched case-insensitively.
//! - **Trim content** - Leading and trailing whitespace is stripped. A file that
//!   is empty afterwards is skipped with a warning instead of polluting the index.
//! - **Enforce limits** - Files above `max_file_bytes` are rejected before reading.
//! - **Stable order** - Documents are sorted by file name so every run indexes
//!   the corpus identically.
//!
//! An empty directory is not an error here; the index layer decides that an
//! empty corpus cannot be served.
//!
//! ## Example
//!
//! ```no_run
//! use ingest::{load_documents, IngestConfig};
//!
//! let docs = load_documents(&IngestConfig::with_data_dir("data")).unwrap();
//! for doc in &docs {
//!     println!("{}: {} bytes", doc.source, doc.content.len());
//! }
//! ```
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn, Level};

mod config;
mod error;
mod types;

pub use crate::config::IngestConfig;
pub use crate::error::IngestError;
pub use crate::types::SourceDocument;

/// Load every allowed file in `cfg.data_dir`, trimmed and sorted by file name.
pub fn load_documents(cfg: &IngestConfig) -> Result<Vec<SourceDocument>, IngestError> {
    cfg.validate()?;
    let start = Instant::now();

    let span = tracing::span!(
        Level::INFO,
        "ingest.load_documents",
        data_dir = %cfg.data_dir.display()
    );
    let _guard = span.enter();

    match load_inner(cfg) {
        Ok(docs) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(documents = docs.len(), elapsed_micros, "ingest_success");
            Ok(docs)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "ingest_failure");
            Err(err)
        }
    }
}

fn load_inner(cfg: &IngestConfig) -> Result<Vec<SourceDocument>, IngestError> {
    let dir = &cfg.data_dir;
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound(dir.clone()));
    }

    let entries = fs::read_dir(dir).map_err(|e| IngestError::io(dir, &e))?;
    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::io(dir, &e))?;
        let path = entry.path();
        if !path.is_file() || !cfg.accepts(&path) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        candidates.push((name, path));
    }
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut docs = Vec::with_capacity(candidates.len());
    for (name, path) in candidates {
        if let Some(limit) = cfg.max_file_bytes {
            let size = fs::metadata(&path)
                .map_err(|e| IngestError::io(&path, &e))?
                .len();
            if size > limit {
                return Err(IngestError::FileTooLarge { path, size, limit });
            }
        }

        let bytes = fs::read(&path).map_err(|e| IngestError::io(&path, &e))?;
        let text = String::from_utf8(bytes).map_err(|_| IngestError::InvalidUtf8 {
            path: path.clone(),
        })?;

        let content = text.trim();
        if content.is_empty() {
            warn!(file = %name, "skipping empty document");
            continue;
        }
        docs.push(SourceDocument::new(name, content));
    }

    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &[u8]) {
        fs::write(dir.join(name), content).expect("write fixture");
    }

    #[test]
    fn loads_trimmed_txt_files_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "log2.txt", b"  The officer arrived at noon.\n");
        write(dir.path(), "log1.txt", b"The car was red.\n\n");
        write(dir.path(), "notes.md", b"ignored");

        let docs = load_documents(&IngestConfig::with_data_dir(dir.path())).unwrap();
        assert_eq!(
            docs,
            vec![
                SourceDocument::new("log1.txt", "The car was red."),
                SourceDocument::new("log2.txt", "The officer arrived at noon."),
            ]
        );
    }

    #[test]
    fn empty_directory_yields_empty_corpus() {
        let dir = TempDir::new().unwrap();
        let docs = load_documents(&IngestConfig::with_data_dir(dir.path())).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn whitespace_only_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "blank.txt", b"   \n\t ");
        write(dir.path(), "real.txt", b"content");

        let docs = load_documents(&IngestConfig::with_data_dir(dir.path())).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, "real.txt");
    }

    #[test]
    fn subdirectories_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();
        write(dir.path(), "a.txt", b"alpha");

        let docs = load_documents(&IngestConfig::with_data_dir(dir.path())).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = load_documents(&IngestConfig::with_data_dir(&missing)).unwrap_err();
        assert_eq!(err, IngestError::DirectoryNotFound(missing));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.txt", &[0xff, 0xfe, 0xfd]);

        let err = load_documents(&IngestConfig::with_data_dir(dir.path())).unwrap_err();
        assert!(matches!(err, IngestError::InvalidUtf8 { .. }));
    }

    #[test]
    fn oversized_files_are_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "big.txt", &[b'a'; 64]);

        let cfg = IngestConfig {
            max_file_bytes: Some(16),
            ..IngestConfig::with_data_dir(dir.path())
        };
        let err = load_documents(&cfg).unwrap_err();
        assert!(matches!(
            err,
            IngestError::FileTooLarge {
                size: 64,
                limit: 16,
                ..
            }
        ));
    }

    #[test]
    fn extra_extensions_are_honoured() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", b"alpha");
        write(dir.path(), "b.LOG", b"beta");

        let cfg = IngestConfig {
            extensions: vec!["txt".into(), "log".into()],
            ..IngestConfig::with_data_dir(dir.path())
        };
        let docs = load_documents(&cfg).unwrap();
        let sources: Vec<_> = docs.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["a.txt", "b.LOG"]);
    }
}
