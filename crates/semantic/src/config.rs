use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;
use crate::SemanticError;

/// Runtime configuration describing which embedder to build and how to post-process vectors.
///
/// # Example
/// ```no_run
/// use semantic::{from_config, SemanticConfig};
///
/// let cfg = SemanticConfig {
///     mode: "api".into(),
///     api_url: Some("https://router.huggingface.co/hf-inference/models/BAAI/bge-small-en-v1.5/pipeline/feature-extraction".into()),
///     api_auth_header: Some("Bearer hf_xxx".into()),
///     api_provider: Some("hf".into()),
///     ..Default::default()
/// };
///
/// let embedder = from_config(&cfg).expect("valid config");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticConfig {
    /// Embedder selector: `"api"` (remote HTTP) or `"hashing"` (offline, deterministic).
    pub mode: String,
    /// Model label; sent as `model` in OpenAI-shaped requests.
    pub model_name: String,
    /// API inference endpoint when [`mode`](Self::mode) is `"api"`.
    pub api_url: Option<String>,
    /// Authorization header (e.g., `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    /// Remote provider hint: `"hf"`, `"openai"`, or `"custom"` (default).
    pub api_provider: Option<String>,
    /// Overall API timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// Normalize the resulting vector to unit-length.
    pub normalize: bool,
    /// Output dimension of the hashing embedder. Ignored in API mode, where the
    /// model decides.
    pub dimension: usize,
    /// Maximum number of texts per batched API request.
    pub batch_size: usize,
    /// Retry configuration for API calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
    /// Whether API calls are retried on transient failures.
    pub enable_retry: bool,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "hashing".into(),
            model_name: "bge-small-en-v1.5".into(),
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: Some(30),
            normalize: true,
            dimension: 384,
            batch_size: 32,
            retry_config: None, // Uses defaults when None
            enable_retry: true,
        }
    }
}

impl SemanticConfig {
    pub fn validate(&self) -> Result<(), SemanticError> {
        match self.mode.as_str() {
            "api" => {
                let url = self.api_url.as_deref().unwrap_or("").trim();
                if url.is_empty() {
                    return Err(SemanticError::InvalidConfig(
                        "api_url is required for api mode".into(),
                    ));
                }
            }
            "hashing" => {
                if self.dimension == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "dimension must be >= 1".into(),
                    ));
                }
            }
            other => {
                return Err(SemanticError::InvalidConfig(format!(
                    "unknown mode '{other}', expected 'api' or 'hashing'"
                )));
            }
        }
        if self.batch_size == 0 {
            return Err(SemanticError::InvalidConfig(
                "batch_size must be >= 1".into(),
            ));
        }
        if self.api_timeout_secs == Some(0) {
            return Err(SemanticError::InvalidConfig(
                "api_timeout_secs must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = SemanticConfig::default();
        assert_eq!(cfg.mode, "hashing");
        assert_eq!(cfg.model_name, "bge-small-en-v1.5");
        assert!(cfg.api_url.is_none());
        assert_eq!(cfg.api_timeout_secs, Some(30));
        assert!(cfg.normalize);
        assert_eq!(cfg.dimension, 384);
        assert_eq!(cfg.batch_size, 32);
        assert!(cfg.enable_retry);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn api_mode_requires_url() {
        let cfg = SemanticConfig {
            mode: "api".into(),
            api_url: Some("  ".into()),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let cfg = SemanticConfig {
            mode: "onnx".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(SemanticError::InvalidConfig(_))));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let cfg = SemanticConfig {
            dimension: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SemanticConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = SemanticConfig {
            mode: "api".into(),
            model_name: "text-embedding-3-small".into(),
            api_url: Some("https://api.example.com/embed".into()),
            api_auth_header: Some("Bearer token123".into()),
            api_provider: Some("openai".into()),
            api_timeout_secs: Some(60),
            normalize: false,
            dimension: 384,
            batch_size: 8,
            retry_config: Some(RetryConfig::default().with_max_retries(1)),
            enable_retry: false,
        };

        let serialized = serde_json::to_string(&cfg).unwrap();
        let deserialized: SemanticConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(cfg, deserialized);
    }
}
