//! Evidence-grounded question answering over a small document corpus.
//!
//! Startup loads a directory of text files, embeds every document and builds
//! an exhaustive cosine-similarity index. Each question is embedded, ranked
//! against the corpus and passed through a confidence gate: when no document
//! clears the similarity threshold the pipeline abstains with a fixed message
//! instead of asking the language model, otherwise it builds an evidence-only
//! prompt and returns the generated answer together with retrieval metadata.
//!
//! ```no_run
//! use evidence_qa::{EvidenceConfig, Pipeline};
//!
//! # async fn run() -> Result<(), evidence_qa::PipelineError> {
//! let config = EvidenceConfig::from_file("evidence-qa.yaml")?;
//! let pipeline = Pipeline::from_config(config).await?;
//!
//! let response = pipeline.answer_question("What color was the car?").await?;
//! println!("{} ({})", response.answer, response.confidence);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod config;
mod error;
mod pipeline;
pub mod prompt;
mod response;

pub use crate::analytics::{
    AnalyticsSummary, ConfidenceDistribution, QueryLog, QueryLogEntry, QueryOutcome,
};
pub use crate::config::{ConfigLoadError, EvidenceConfig};
pub use crate::error::PipelineError;
pub use crate::pipeline::Pipeline;
pub use crate::response::{
    ABSTENTION_MESSAGE, AnswerResponse, RetrievalDiagnostics, RetrievedDocument,
};

pub use generate::{ChatCompletionsGenerator, GenerateConfig, GenerateError, Generator};
pub use index::{Document, IndexError, RetrievalResult, VectorIndex};
pub use ingest::{IngestConfig, IngestError, SourceDocument, load_documents};
pub use matcher::{
    ConfidenceGate, ConfidenceLevel, GateConfig, GateOutcome, GatedResult, MatchError, Retriever,
    SearchScope,
};
pub use semantic::{
    ApiEmbedder, Embedder, HashingEmbedder, RetryConfig, SemanticConfig, SemanticError,
};
