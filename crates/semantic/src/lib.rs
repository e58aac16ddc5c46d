//! Text embedding capability for evidence retrieval.
//!
//! This crate turns text into fixed-dimension vectors behind the [`Embedder`]
//! trait, so the retrieval layers never care where vectors come from.
//!
//! Two embedders ship with it:
//!
//! - **API mode** ([`ApiEmbedder`]) calls a remote inference endpoint
//!   (HuggingFace feature-extraction, OpenAI `/embeddings`, or a custom
//!   `{"text": ..}` service). Batches go out in chunks of `batch_size` and
//!   transient failures are retried with exponential backoff.
//! - **Hashing mode** ([`HashingEmbedder`]) is an offline feature-hashing
//!   embedder. It needs no model files or network, which makes it the
//!   default for tests and demos.
//!
//! Pick one at runtime with [`from_config`]:
//!
//! ```
//! use semantic::{from_config, SemanticConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let embedder = from_config(&SemanticConfig::default()).unwrap();
//! let vector = embedder.embed("The car was red.").await.unwrap();
//! assert_eq!(vector.len(), 384);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod retry;
mod serde_millis;

mod api;
mod hashing;
mod normalize;

pub use crate::api::ApiEmbedder;
pub use crate::config::SemanticConfig;
pub use crate::error::SemanticError;
pub use crate::hashing::HashingEmbedder;
pub use crate::retry::RetryConfig;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Text embedding capability.
///
/// Implementations must return vectors of one fixed dimension for the
/// lifetime of the embedder.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Label of the underlying model, for logs and diagnostics.
    fn model_name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError>;

    /// Embed several texts; output is positional (`out[i]` embeds `texts[i]`).
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SemanticError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Build the embedder selected by `cfg.mode`.
pub fn from_config(cfg: &SemanticConfig) -> Result<Arc<dyn Embedder>, SemanticError> {
    cfg.validate()?;
    let embedder: Arc<dyn Embedder> = match cfg.mode.as_str() {
        "api" => Arc::new(ApiEmbedder::new(cfg.clone())?),
        "hashing" => Arc::new(HashingEmbedder::new(cfg.dimension, cfg.normalize)?),
        other => {
            return Err(SemanticError::InvalidConfig(format!(
                "unknown mode '{other}'"
            )))
        }
    };
    info!(mode = %cfg.mode, model = embedder.model_name(), "embedder ready");
    Ok(embedder)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubling;

    #[async_trait]
    impl Embedder for Doubling {
        fn model_name(&self) -> &str {
            "doubling"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
            if text == "boom" {
                return Err(SemanticError::Inference("boom".into()));
            }
            Ok(vec![text.len() as f32 * 2.0])
        }
    }

    #[tokio::test]
    async fn default_embed_many_is_sequential_and_positional() {
        let texts = vec!["a".to_string(), "abc".to_string()];
        let out = Doubling.embed_many(&texts).await.unwrap();
        assert_eq!(out, vec![vec![2.0], vec![6.0]]);
    }

    #[tokio::test]
    async fn default_embed_many_propagates_errors() {
        let texts = vec!["ok".to_string(), "boom".to_string()];
        let err = Doubling.embed_many(&texts).await.unwrap_err();
        assert_eq!(err, SemanticError::Inference("boom".into()));
    }

    #[test]
    fn from_config_builds_hashing_embedder() {
        let embedder = from_config(&SemanticConfig::default()).unwrap();
        assert_eq!(embedder.model_name(), "feature-hashing-384");
    }

    #[test]
    fn from_config_builds_api_embedder() {
        let cfg = SemanticConfig {
            mode: "api".into(),
            api_url: Some("https://api.example.com/embed".into()),
            ..Default::default()
        };
        let embedder = from_config(&cfg).unwrap();
        assert_eq!(embedder.model_name(), "bge-small-en-v1.5");
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let cfg = SemanticConfig {
            mode: "api".into(),
            ..Default::default()
        };
        assert!(from_config(&cfg).is_err());
    }
}
