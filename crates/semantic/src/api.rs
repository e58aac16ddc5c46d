use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::normalize::l2_normalize_in_place;
use crate::retry::execute_with_retry_async;
use crate::{Embedder, SemanticConfig, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

/// Embedder backed by a remote HTTP inference endpoint.
///
/// Supports HuggingFace feature-extraction, OpenAI `/embeddings` and a plain
/// `{"text": ..}` / `{"texts": [..]}` custom shape. Transient failures are
/// retried according to the config's [`RetryConfig`](crate::RetryConfig).
#[derive(Debug, Clone)]
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    provider: ApiProviderKind,
    cfg: SemanticConfig,
}

impl ApiEmbedder {
    pub fn new(cfg: SemanticConfig) -> Result<Self, SemanticError> {
        let url = cfg
            .api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                SemanticError::InvalidConfig("api_url is required for api mode".into())
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.api_timeout_secs.unwrap_or(30)))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            provider: api_provider_kind(&cfg),
            cfg,
        })
    }

    /// Send one request (with retries) and return the raw vectors.
    async fn request(&self, texts: &[String], batch: bool) -> Result<Vec<Vec<f32>>, SemanticError> {
        let payload = build_api_payload(self.provider, texts, &self.cfg.model_name, batch);

        let response = if self.cfg.enable_retry {
            let retry_cfg = self.cfg.retry_config.unwrap_or_default();
            execute_with_retry_async(&retry_cfg, SemanticError::is_retryable, |_attempt| {
                self.send_api_request(payload.clone())
            })
            .await
            .into_result()?
        } else {
            self.send_api_request(payload).await?
        };

        let mut vectors = parse_embeddings_from_value(response)?;
        if let Some(position) = vectors.iter().position(Vec::is_empty) {
            return Err(SemanticError::Inference(format!(
                "API returned an empty embedding at position {position}"
            )));
        }
        if self.cfg.normalize {
            for v in vectors.iter_mut() {
                l2_normalize_in_place(v);
            }
        }
        Ok(vectors)
    }

    async fn send_api_request(&self, payload: Value) -> Result<Value, SemanticError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.cfg.api_auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request
            .json(&payload)
            .send()
            .await
            .map_err(|e| SemanticError::Transport(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Transport(format!(
                "HTTP error {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::Inference(format!("Invalid JSON response: {e}")))
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    fn model_name(&self) -> &str {
        &self.cfg.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        let mut vectors = self.request(&[text.to_string()], false).await?;
        match vectors.len() {
            1 => Ok(vectors.remove(0)),
            0 => Err(SemanticError::Inference(
                "API response did not contain embeddings".into(),
            )),
            n => Err(SemanticError::Inference(format!(
                "API returned {n} embeddings for a single input"
            ))),
        }
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, SemanticError> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.cfg.batch_size.max(1)) {
            let vectors = self.request(chunk, true).await?;
            if vectors.len() != chunk.len() {
                return Err(SemanticError::Inference(format!(
                    "API returned {} embeddings for {} inputs",
                    vectors.len(),
                    chunk.len()
                )));
            }
            debug!(batch = chunk.len(), "embedded batch");
            out.extend(vectors);
        }
        Ok(out)
    }
}

fn api_provider_kind(cfg: &SemanticConfig) -> ApiProviderKind {
    let provider = cfg
        .api_provider
        .as_deref()
        .unwrap_or("custom")
        .to_ascii_lowercase();
    match provider.as_str() {
        "hf" | "huggingface" => ApiProviderKind::HuggingFace,
        "openai" | "gpt" => ApiProviderKind::OpenAI,
        _ => ApiProviderKind::Custom,
    }
}

fn build_api_payload(provider: ApiProviderKind, texts: &[String], model: &str, batch: bool) -> Value {
    let first = texts.first().map(String::as_str).unwrap_or("");
    match provider {
        ApiProviderKind::HuggingFace => {
            if batch {
                json!({ "inputs": texts })
            } else {
                json!({ "inputs": first })
            }
        }
        ApiProviderKind::OpenAI => {
            if batch {
                json!({ "input": texts, "model": model })
            } else {
                json!({ "input": first, "model": model })
            }
        }
        ApiProviderKind::Custom => {
            if batch {
                json!({ "texts": texts })
            } else {
                json!({ "text": first })
            }
        }
    }
}

fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                return items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut obj) => obj
                            .remove("embedding")
                            .ok_or_else(|| {
                                SemanticError::Inference(
                                    "missing `embedding` field in data item".into(),
                                )
                            })
                            .and_then(parse_embedding_vector),
                        _ => Err(SemanticError::Inference(
                            "unexpected entry inside `data` array".into(),
                        )),
                    })
                    .collect();
            }

            Err(SemanticError::Inference(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, SemanticError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| SemanticError::Inference("non-finite embedding value".into())),
                other => Err(SemanticError::Inference(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(SemanticError::Inference(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}
