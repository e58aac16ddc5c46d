use serde::{Deserialize, Serialize};

/// One loaded document: trimmed text plus the file name it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub content: String,
    /// File name (not the full path), used as the citation label.
    pub source: String,
}

impl SourceDocument {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}
