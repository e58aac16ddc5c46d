use thiserror::Error;

use crate::retry::is_retryable_error;

/// Errors surfaced by [`Embedder`](crate::Embedder) implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// Configuration is inconsistent (e.g., `api` mode without an `api_url`).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// The embedding service could not be reached or answered with an HTTP error.
    #[error("embedding request failed: {0}")]
    Transport(String),
    /// The service answered but the payload could not be turned into vectors.
    #[error("inference failure: {0}")]
    Inference(String),
}

impl SemanticError {
    /// Whether another attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SemanticError::Transport(msg) => is_retryable_error(msg),
            SemanticError::InvalidConfig(_) | SemanticError::Inference(_) => false,
        }
    }
}
