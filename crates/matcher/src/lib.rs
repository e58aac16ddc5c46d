//! # Evidence Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits between the embedding layer (`semantic`) and the vector
//! index (`index`). It turns a free-text question into ranked candidates and
//! decides whether those candidates are good enough to answer from.
//!
//! ## Core Types
//!
//! - [`Retriever`]: embeds the question with an injected [`semantic::Embedder`]
//!   and searches the shared [`index::VectorIndex`].
//! - [`ConfidenceGate`]: tags every candidate against the similarity
//!   threshold, buckets scores into [`ConfidenceLevel`]s, and decides whether
//!   to abstain.
//! - [`GateConfig`]: threshold and bucket cutoffs.
//! - [`SearchScope`]: how many candidates a query pulls (`All` or `TopN`).
//! - [`MatchError`]: typed failure surface; nothing is swallowed.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use index::{Document, VectorIndex};
//! use matcher::{ConfidenceGate, GateConfig, Retriever, SearchScope};
//! use semantic::{from_config, SemanticConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = from_config(&SemanticConfig::default())?;
//! let vector = embedder.embed("The car was red.").await?;
//! let index = Arc::new(VectorIndex::build(vec![Document::new(
//!     "log1.txt",
//!     "The car was red.",
//!     vector,
//! )])?);
//!
//! let retriever = Retriever::new(embedder, index.clone());
//! let gate = ConfidenceGate::new(GateConfig::default())?;
//!
//! let top_k = SearchScope::All.top_k(index.len());
//! let outcome = gate.evaluate(retriever.search("What color was the car?", top_k).await?);
//! if outcome.abstain {
//!     println!("no relevant evidence");
//! }
//! # Ok(())
//! # }
//! ```

mod gate;
mod retriever;
mod types;

pub use crate::gate::ConfidenceGate;
pub use crate::retriever::Retriever;
pub use crate::types::{
    ConfidenceLevel, GateConfig, GateOutcome, GatedResult, MatchError, SearchScope,
};
