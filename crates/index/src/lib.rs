//! # Evidence Index
//!
//! A flat, exhaustive vector index for small document corpora. Every query is
//! scored against every stored document, so results are exact rather than
//! approximate.
//!
//! ## Core Features
//!
//! - **Cosine similarity**: document embeddings are L2-normalized once at
//!   build time and stored as rows of a dense matrix; a query is normalized
//!   and scored with a single matrix-vector product.
//! - **Build once, read many**: [`VectorIndex::build`] validates the whole
//!   corpus up front (non-empty, uniform dimension, finite values). After that
//!   the index is immutable and can be shared across threads without locking.
//! - **Deterministic ranking**: results are ordered by descending score and
//!   ties keep the original insertion order.
//! - **Degenerate vectors**: a zero-norm document or query scores `0.0`
//!   against everything instead of producing `NaN`.
//!
//! ## Example Usage
//!
//! ```
//! use index::{Document, VectorIndex};
//!
//! let index = VectorIndex::build(vec![
//!     Document::new("log1.txt", "The car was red.", vec![1.0, 0.0, 0.0]),
//!     Document::new("log2.txt", "The officer arrived.", vec![0.0, 1.0, 0.0]),
//! ])
//! .unwrap();
//!
//! let hits = index.search(&[0.9, 0.1, 0.0], 10).unwrap();
//! assert_eq!(hits.len(), 2);
//! assert_eq!(hits[0].source, "log1.txt");
//! ```

mod query;
mod vector;

pub use query::RetrievalResult;
pub use vector::{cosine_similarity, l2_norm, normalize_in_place};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// A document paired with its embedding, as handed to [`VectorIndex::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier of the originating file or record.
    pub source: String,
    /// Text content that was embedded.
    pub content: String,
    /// Raw (not necessarily normalized) embedding.
    pub embedding: Vec<f32>,
}

impl Document {
    pub fn new(
        source: impl Into<String>,
        content: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
            embedding,
        }
    }
}

/// Stored half of a [`Document`]; the embedding lives in the index matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub source: String,
    pub content: String,
}

/// Errors raised while building or querying a [`VectorIndex`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// No documents were supplied; an empty index cannot answer queries.
    #[error("cannot build an index over an empty corpus")]
    EmptyCorpus,
    /// A document embedding differs in length from the first one.
    #[error("embedding at position {position} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        position: usize,
        expected: usize,
        found: usize,
    },
    /// A document embedding has no components at all.
    #[error("embedding at position {position} is empty")]
    EmptyEmbedding { position: usize },
    /// A document embedding contains NaN or infinity.
    #[error("embedding at position {position} contains non-finite values")]
    NonFiniteEmbedding { position: usize },
    /// The query vector does not match the index dimension.
    #[error("query has dimension {found}, index expects {expected}")]
    QueryDimensionMismatch { expected: usize, found: usize },
    /// The query vector contains NaN or infinity.
    #[error("query vector contains non-finite values")]
    NonFiniteQuery,
    /// The embedding matrix could not be assembled.
    #[error("failed to assemble embedding matrix: {0}")]
    Shape(String),
}

/// Exhaustive cosine-similarity index.
///
/// Row `i` of the embedding matrix corresponds to `documents[i]`; both are
/// fixed at construction time.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    documents: Vec<IndexedDocument>,
    embeddings: Array2<f32>,
}

impl VectorIndex {
    /// Build an index from an ordered, non-empty sequence of documents.
    pub fn build<I>(documents: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut iter = documents.into_iter().peekable();
        let dimension = match iter.peek() {
            Some(first) => first.embedding.len(),
            None => return Err(IndexError::EmptyCorpus),
        };
        if dimension == 0 {
            return Err(IndexError::EmptyEmbedding { position: 0 });
        }

        let (lower, _) = iter.size_hint();
        let mut stored = Vec::with_capacity(lower);
        let mut flat = Vec::with_capacity(lower * dimension);
        let mut degenerate = 0usize;

        for (position, doc) in iter.enumerate() {
            let Document {
                source,
                content,
                mut embedding,
            } = doc;

            if embedding.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    position,
                    expected: dimension,
                    found: embedding.len(),
                });
            }
            if embedding.iter().any(|v| !v.is_finite()) {
                return Err(IndexError::NonFiniteEmbedding { position });
            }
            if !normalize_in_place(&mut embedding) {
                degenerate += 1;
                warn!(%source, "document embedding has zero norm; it will never match");
            }

            flat.extend_from_slice(&embedding);
            stored.push(IndexedDocument { source, content });
        }

        let embeddings = Array2::from_shape_vec((stored.len(), dimension), flat)
            .map_err(|e| IndexError::Shape(e.to_string()))?;

        debug!(
            documents = stored.len(),
            dimension, degenerate, "vector index built"
        );

        Ok(Self {
            documents: stored,
            embeddings,
        })
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always `false` for a successfully built index.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Embedding dimensionality shared by every document.
    pub fn dimension(&self) -> usize {
        self.embeddings.ncols()
    }

    /// Indexed documents in insertion order.
    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str, embedding: Vec<f32>) -> Document {
        Document::new(source, format!("content of {source}"), embedding)
    }

    #[test]
    fn build_rejects_empty_corpus() {
        let result = VectorIndex::build(Vec::new());
        assert_eq!(result.unwrap_err(), IndexError::EmptyCorpus);
    }

    #[test]
    fn build_rejects_dimension_mismatch() {
        let result = VectorIndex::build(vec![
            doc("a", vec![1.0, 0.0, 0.0]),
            doc("b", vec![0.0, 1.0, 0.0]),
            doc("c", vec![0.0, 1.0]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            IndexError::DimensionMismatch {
                position: 2,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn build_rejects_empty_embeddings() {
        let result = VectorIndex::build(vec![doc("a", Vec::new())]);
        assert_eq!(
            result.unwrap_err(),
            IndexError::EmptyEmbedding { position: 0 }
        );
    }

    #[test]
    fn build_rejects_non_finite_values() {
        let result = VectorIndex::build(vec![
            doc("a", vec![1.0, 0.0]),
            doc("b", vec![f32::NAN, 1.0]),
        ]);
        assert_eq!(
            result.unwrap_err(),
            IndexError::NonFiniteEmbedding { position: 1 }
        );
    }

    #[test]
    fn build_keeps_insertion_order_and_dimension() {
        let index = VectorIndex::build(vec![
            doc("first", vec![1.0, 2.0]),
            doc("second", vec![3.0, 4.0]),
        ])
        .expect("index builds");

        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
        assert_eq!(index.dimension(), 2);
        let sources: Vec<_> = index.documents().iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["first", "second"]);
    }

    #[test]
    fn stored_rows_are_unit_length() {
        let index = VectorIndex::build(vec![doc("a", vec![3.0, 4.0]), doc("b", vec![0.0, 0.0])])
            .expect("index builds");

        let row = index.embeddings.row(0).to_vec();
        assert!((l2_norm(&row) - 1.0).abs() < 1e-6);
        // Degenerate rows stay at zero rather than turning into NaN.
        assert!(index.embeddings.row(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = IndexError::DimensionMismatch {
            position: 4,
            expected: 384,
            found: 768,
        };
        let msg = err.to_string();
        assert!(msg.contains("position 4"));
        assert!(msg.contains("768"));
        assert!(msg.contains("384"));
    }
}
