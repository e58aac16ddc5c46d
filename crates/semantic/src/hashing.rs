use async_trait::async_trait;
use fxhash::hash64;

use crate::normalize::l2_normalize_in_place;
use crate::{Embedder, SemanticError};

/// Function words that carry no topical signal.
const STOPWORDS: &[&str] = &[
    "a", "about", "all", "am", "an", "and", "any", "are", "as", "at", "be", "been", "being", "but",
    "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he", "her",
    "here", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "me", "my", "no",
    "not", "of", "on", "or", "our", "she", "so", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "to", "us", "was", "we", "were", "what", "when",
    "where", "which", "who", "whom", "why", "will", "with", "would", "you", "your",
];

/// Deterministic feature-hashing embedder.
///
/// Each non-stopword token is hashed into one of `dimension` buckets with a
/// sign taken from the hash's top bit, so texts sharing vocabulary point in
/// similar directions. Needs no model files or network and always yields the
/// same vector for the same text. A text with no content words embeds to the
/// zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    normalize: bool,
    model_name: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize, normalize: bool) -> Result<Self, SemanticError> {
        if dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "dimension must be >= 1".into(),
            ));
        }
        Ok(Self {
            dimension,
            normalize,
            model_name: format!("feature-hashing-{dimension}"),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dimension];
        for token in tokens(text) {
            let h = hash64(token.as_bytes());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

/// Lowercased alphanumeric runs with stopwords removed.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        Ok(self.embed_sync(text))
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SemanticError> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }
}
