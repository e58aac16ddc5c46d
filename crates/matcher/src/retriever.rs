use std::sync::Arc;

use index::{RetrievalResult, VectorIndex};
use semantic::Embedder;
use tracing::debug;

use crate::types::MatchError;

/// Embeds a question and ranks the corpus against it.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<VectorIndex>) -> Self {
        Self { embedder, index }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Top `top_k` documents for `question`, best first.
    pub async fn search(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, MatchError> {
        if question.trim().is_empty() {
            return Err(MatchError::EmptyQuery);
        }

        let query = self.embedder.embed(question).await?;
        let results = self.index.search(&query, top_k)?;

        debug!(
            model = self.embedder.model_name(),
            top_k,
            returned = results.len(),
            best_score = results.first().map(|r| r.score),
            "retrieval complete"
        );
        Ok(results)
    }
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("model", &self.embedder.model_name())
            .field("documents", &self.index.len())
            .finish()
    }
}
