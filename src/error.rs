use generate::GenerateError;
use index::IndexError;
use ingest::IngestError;
use matcher::MatchError;
use semantic::SemanticError;
use thiserror::Error;

use crate::config::ConfigLoadError;
use crate::response::RetrievalDiagnostics;

/// Errors surfaced while starting the pipeline or answering a question.
///
/// Startup fails with `Config`, `Load`, `EmptyCorpus`, `DimensionMismatch`,
/// `Index` or `Embedding`. A single query fails with `Retrieval` or
/// `Generation`; an abstention is not an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("failed to load documents: {0}")]
    Load(#[from] IngestError),

    /// The loader produced no documents to index.
    #[error("no documents to index")]
    EmptyCorpus,

    /// Document embeddings disagree on their dimension.
    #[error("document {position} embedding has dimension {found}, expected {expected}")]
    DimensionMismatch {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to build index: {0}")]
    Index(IndexError),

    #[error("failed to embed documents: {0}")]
    Embedding(#[from] SemanticError),

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] MatchError),

    /// Evidence was found but no answer could be generated.
    #[error("answer generation failed: {source}")]
    Generation {
        source: GenerateError,
        diagnostics: Box<RetrievalDiagnostics>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Retrieval diagnostics attached to a generation failure.
    pub fn diagnostics(&self) -> Option<&RetrievalDiagnostics> {
        match self {
            PipelineError::Generation { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }

    /// Whether the error happened before the pipeline could serve queries.
    pub fn is_startup(&self) -> bool {
        !matches!(
            self,
            PipelineError::Retrieval(_) | PipelineError::Generation { .. }
        )
    }
}

impl From<IndexError> for PipelineError {
    fn from(value: IndexError) -> Self {
        match value {
            IndexError::EmptyCorpus => PipelineError::EmptyCorpus,
            IndexError::DimensionMismatch {
                position,
                expected,
                found,
            } => PipelineError::DimensionMismatch {
                position,
                expected,
                found,
            },
            other => PipelineError::Index(other),
        }
    }
}
