//! OpenAI-compatible chat-completions client.
//!
//! Works against any provider exposing `POST {base}/chat/completions` with
//! bearer auth (Groq, OpenAI, Together, a local llama.cpp or Ollama server).

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::{GenerateConfig, GenerateError, Generator};

/// Sends the prompt as a single user message and returns the first choice.
#[derive(Debug, Clone)]
pub struct ChatCompletionsGenerator {
    config: GenerateConfig,
    api_key: Option<String>,
    endpoint: String,
    client: reqwest::Client,
}

impl ChatCompletionsGenerator {
    /// Build a client with an explicit key. A `None` or blank key is accepted
    /// here and reported as [`GenerateError::MissingCredentials`] on use.
    pub fn new(config: GenerateConfig, api_key: Option<String>) -> Result<Self, GenerateError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GenerateError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            config,
            client,
        })
    }

    /// Build a client whose key comes from the `api_key_env` variable.
    pub fn from_env(config: GenerateConfig) -> Result<Self, GenerateError> {
        let key = std::env::var(&config.api_key_env).ok();
        Self::new(config, key)
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Generator for ChatCompletionsGenerator {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerateError::MissingCredentials(self.config.api_key_env.clone()))?;

        let body = build_request_body(&self.config, prompt);
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(format!("{} ({})", e, self.endpoint)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| GenerateError::Transport(format!("invalid JSON response: {e}")))?;

        if let Some((prompt_tokens, completion_tokens)) = token_usage(&json) {
            debug!(
                model = %self.config.model,
                prompt_tokens,
                completion_tokens,
                "completion received"
            );
        }

        parse_completion(&json)
    }
}

/// Request body for one completion; the prompt is sent as a lone user message.
pub fn build_request_body(config: &GenerateConfig, prompt: &str) -> Value {
    json!({
        "model": config.model,
        "messages": [{ "role": "user", "content": prompt }],
        "temperature": config.temperature,
        "max_tokens": config.max_tokens,
    })
}

/// `(prompt_tokens, completion_tokens)` from the `usage` block, if present.
fn token_usage(json: &Value) -> Option<(Option<u64>, Option<u64>)> {
    let usage = json["usage"].as_object()?;
    let count = |key: &str| usage.get(key).and_then(Value::as_u64);
    Some((count("prompt_tokens"), count("completion_tokens")))
}

/// Extract `choices[0].message.content`, trimmed.
pub fn parse_completion(json: &Value) -> Result<String, GenerateError> {
    let content = json["choices"]
        .get(0)
        .and_then(|choice| choice["message"]["content"].as_str())
        .map(str::trim)
        .unwrap_or("");
    if content.is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    Ok(content.to_string())
}
