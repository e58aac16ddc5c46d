use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by [`Generator`](crate::Generator) implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    /// The API key environment variable is unset or empty.
    #[error("missing credentials: set {0}")]
    MissingCredentials(String),
    /// The request never produced an HTTP response.
    #[error("generation request failed: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("generation API error {status}: {body}")]
    Api { status: u16, body: String },
    /// The response carried no usable answer text.
    #[error("generation response contained no answer")]
    EmptyResponse,
    #[error("invalid generate config: {0}")]
    InvalidConfig(String),
    /// The caller's deadline elapsed before an answer arrived.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}
