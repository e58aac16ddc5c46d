//! Error types produced by the ingest crate.
//!
//! Every variant carries the offending path so a failed startup points at the
//! file to fix. Errors are cloneable and comparable to keep tests precise.
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`DirectoryNotFound`](IngestError::DirectoryNotFound) | `data_dir` missing or not a directory |
//! | [`Io`](IngestError::Io) | Listing or reading failed |
//! | [`InvalidUtf8`](IngestError::InvalidUtf8) | File is not UTF-8 text |
//! | [`FileTooLarge`](IngestError::FileTooLarge) | File exceeds `max_file_bytes` |
//! | [`InvalidConfig`](IngestError::InvalidConfig) | Configuration rejected by validation |
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the document corpus.
///
/// # Examples
///
/// ```rust
/// use ingest::IngestError;
/// use std::path::PathBuf;
///
/// let err = IngestError::DirectoryNotFound(PathBuf::from("missing"));
/// assert_eq!(err.to_string(), "document directory not found: missing");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    #[error("document directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("file is not valid utf-8: {}", path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("file {} is {size} bytes, limit is {limit}", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("invalid ingest config: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_include_paths() {
        let err = IngestError::FileTooLarge {
            path: PathBuf::from("data/huge.txt"),
            size: 20,
            limit: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("data/huge.txt"));
        assert!(msg.contains("20"));
        assert!(msg.contains("10"));

        let err = IngestError::InvalidUtf8 {
            path: PathBuf::from("bin.txt"),
        };
        assert!(err.to_string().contains("bin.txt"));
    }

    #[test]
    fn io_helper_keeps_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = IngestError::io("x.txt", &io);
        assert_eq!(
            err,
            IngestError::Io {
                path: PathBuf::from("x.txt"),
                message: "denied".into(),
            }
        );
    }
}
