//! YAML configuration for the evidence QA pipeline.
//!
//! Every stage reads its settings from one file. Sections that are omitted
//! fall back to defaults, so an empty document (`version: "1.0"`) is a valid
//! configuration that indexes `./data` with the offline hashing embedder.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//!
//! ingest:
//!   data_dir: "./data"
//!   extensions: ["txt"]
//!   max_file_bytes: 10485760
//!
//! semantic:
//!   mode: "api"
//!   model_name: "bge-small-en-v1.5"
//!   api_url: "https://router.huggingface.co/hf-inference/models/BAAI/bge-small-en-v1.5/pipeline/feature-extraction"
//!   api_provider: "hf"
//!   normalize: true
//!   retry:
//!     max_retries: 3
//!     base_delay: 100
//!     max_delay: 5000
//!     backoff_multiplier: 2.0
//!     jitter: true
//!
//! retrieval:
//!   scope: "all"
//!
//! gate:
//!   similarity_threshold: 0.10
//!   high_cutoff: 0.45
//!   medium_cutoff: 0.30
//!
//! generate:
//!   api_url: "https://api.groq.com/openai/v1"
//!   model: "llama-3.1-8b-instant"
//!   temperature: 0.2
//!   max_tokens: 800
//!   api_key_env: "GROQ_API_KEY"
//!
//! analytics:
//!   capacity: 1000
//!
//! generation_timeout_secs: 30
//! ```
//!
//! ## Environment overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `EVIDENCE_QA_DATA_DIR` | `ingest.data_dir` |
//! | `EVIDENCE_QA_SIMILARITY_THRESHOLD` | `gate.similarity_threshold` |
//! | `EVIDENCE_QA_EMBED_URL` | `semantic.api_url` (switches `mode` to `api`) |
//! | `EVIDENCE_QA_EMBED_TOKEN` | `semantic.api_auth_header` as a bearer token |
//! | `EVIDENCE_QA_LLM_URL` | `generate.api_url` |
//! | `EVIDENCE_QA_LLM_MODEL` | `generate.model` |

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use generate::GenerateConfig;
use ingest::IngestConfig;
use matcher::{GateConfig, SearchScope};
use semantic::{RetryConfig, SemanticConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_DATA_DIR: &str = "EVIDENCE_QA_DATA_DIR";
pub const ENV_SIMILARITY_THRESHOLD: &str = "EVIDENCE_QA_SIMILARITY_THRESHOLD";
pub const ENV_EMBED_URL: &str = "EVIDENCE_QA_EMBED_URL";
pub const ENV_EMBED_TOKEN: &str = "EVIDENCE_QA_EMBED_TOKEN";
pub const ENV_LLM_URL: &str = "EVIDENCE_QA_LLM_URL";
pub const ENV_LLM_MODEL: &str = "EVIDENCE_QA_LLM_MODEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EvidenceConfig {
    /// Configuration format version.
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub ingest: IngestYamlConfig,

    #[serde(default)]
    pub semantic: SemanticYamlConfig,

    #[serde(default)]
    pub retrieval: RetrievalYamlConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub generate: GenerateYamlConfig,

    #[serde(default)]
    pub analytics: AnalyticsYamlConfig,

    /// Deadline for one generation call; `None` waits for the HTTP timeout.
    #[serde(default)]
    pub generation_timeout_secs: Option<u64>,
}

impl EvidenceConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: EvidenceConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `EVIDENCE_QA_*` overrides read through `lookup`, then re-validate.
    ///
    /// Pass `|key| std::env::var(key).ok()` for the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_DATA_DIR) {
            self.ingest.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(ENV_SIMILARITY_THRESHOLD) {
            self.gate.similarity_threshold = raw.trim().parse().map_err(|_| {
                ConfigLoadError::Validation(format!(
                    "{ENV_SIMILARITY_THRESHOLD} must be a number, got '{raw}'"
                ))
            })?;
        }
        if let Some(url) = get(ENV_EMBED_URL) {
            self.semantic.mode = "api".into();
            self.semantic.api_url = Some(url);
        }
        if let Some(token) = get(ENV_EMBED_TOKEN) {
            self.semantic.api_auth_header = Some(format!("Bearer {}", token.trim()));
        }
        if let Some(url) = get(ENV_LLM_URL) {
            self.generate.api_url = url;
        }
        if let Some(model) = get(ENV_LLM_MODEL) {
            self.generate.model = model;
        }

        self.validate()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }

        self.ingest_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("ingest: {e}")))?;
        self.semantic_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("semantic: {e}")))?;
        self.search_scope()?
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("retrieval: {e}")))?;
        self.gate
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("gate: {e}")))?;
        self.generate_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("generate: {e}")))?;
        if self.analytics.capacity == 0 {
            return Err(ConfigLoadError::Validation(
                "analytics.capacity must be >= 1".to_string(),
            ));
        }
        if self.generation_timeout_secs == Some(0) {
            return Err(ConfigLoadError::Validation(
                "generation_timeout_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            data_dir: self.ingest.data_dir.clone(),
            extensions: self.ingest.extensions.clone(),
            max_file_bytes: self.ingest.max_file_bytes,
        }
    }

    pub fn semantic_config(&self) -> SemanticConfig {
        let s = &self.semantic;
        SemanticConfig {
            mode: s.mode.clone(),
            model_name: s.model_name.clone(),
            api_url: s.api_url.clone(),
            api_auth_header: s.api_auth_header.clone(),
            api_provider: s.api_provider.clone(),
            api_timeout_secs: s.api_timeout_secs,
            normalize: s.normalize,
            dimension: s.dimension,
            batch_size: s.batch_size,
            retry_config: s.retry,
            enable_retry: s.enable_retry,
        }
    }

    pub fn search_scope(&self) -> Result<SearchScope, ConfigLoadError> {
        match self.retrieval.scope.as_str() {
            "all" => Ok(SearchScope::All),
            "top_n" => Ok(SearchScope::TopN(self.retrieval.top_n)),
            other => Err(ConfigLoadError::Validation(format!(
                "retrieval.scope must be 'all' or 'top_n', got '{other}'"
            ))),
        }
    }

    pub fn generate_config(&self) -> GenerateConfig {
        let g = &self.generate;
        GenerateConfig {
            api_url: g.api_url.clone(),
            chat_path: g.chat_path.clone(),
            model: g.model.clone(),
            temperature: g.temperature,
            max_tokens: g.max_tokens,
            api_key_env: g.api_key_env.clone(),
            timeout_secs: g.timeout_secs,
        }
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            ingest: IngestYamlConfig::default(),
            semantic: SemanticYamlConfig::default(),
            retrieval: RetrievalYamlConfig::default(),
            gate: GateConfig::default(),
            generate: GenerateYamlConfig::default(),
            analytics: AnalyticsYamlConfig::default(),
            generation_timeout_secs: None,
        }
    }
}

/// Document loader YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestYamlConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: Option<u64>,
}

impl Default for IngestYamlConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            extensions: default_extensions(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// Embedding YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticYamlConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_model_name")]
    pub model_name: String,

    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub api_auth_header: Option<String>,

    #[serde(default)]
    pub api_provider: Option<String>,

    #[serde(default = "default_timeout")]
    pub api_timeout_secs: Option<u64>,

    #[serde(default = "true_value")]
    pub normalize: bool,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub retry: Option<RetryConfig>,

    #[serde(default = "true_value")]
    pub enable_retry: bool,
}

impl Default for SemanticYamlConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model_name: default_model_name(),
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: default_timeout(),
            normalize: true,
            dimension: default_dimension(),
            batch_size: default_batch_size(),
            retry: None,
            enable_retry: true,
        }
    }
}

/// Retrieval scope YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalYamlConfig {
    /// `"all"` scores the whole corpus; `"top_n"` keeps the best `top_n`.
    #[serde(default = "default_scope")]
    pub scope: String,

    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RetrievalYamlConfig {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            top_n: default_top_n(),
        }
    }
}

/// Answer generation YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateYamlConfig {
    #[serde(default = "default_llm_url")]
    pub api_url: String,

    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for GenerateYamlConfig {
    fn default() -> Self {
        let g = GenerateConfig::default();
        Self {
            api_url: g.api_url,
            chat_path: g.chat_path,
            model: g.model,
            temperature: g.temperature,
            max_tokens: g.max_tokens,
            api_key_env: g.api_key_env,
            timeout_secs: g.timeout_secs,
        }
    }
}

/// Query analytics YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsYamlConfig {
    /// Maximum number of query log entries kept in memory.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for AnalyticsYamlConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

// Default value functions
fn true_value() -> bool {
    true
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}
fn default_max_file_bytes() -> Option<u64> {
    IngestConfig::default().max_file_bytes
}
fn default_mode() -> String {
    "hashing".to_string()
}
fn default_model_name() -> String {
    "bge-small-en-v1.5".to_string()
}
fn default_timeout() -> Option<u64> {
    Some(30)
}
fn default_dimension() -> usize {
    384
}
fn default_batch_size() -> usize {
    32
}
fn default_scope() -> String {
    "all".to_string()
}
fn default_top_n() -> usize {
    5
}
fn default_llm_url() -> String {
    GenerateConfig::default().api_url
}
fn default_chat_path() -> String {
    GenerateConfig::default().chat_path
}
fn default_llm_model() -> String {
    GenerateConfig::default().model
}
fn default_temperature() -> f32 {
    GenerateConfig::default().temperature
}
fn default_max_tokens() -> u32 {
    GenerateConfig::default().max_tokens
}
fn default_api_key_env() -> String {
    GenerateConfig::default().api_key_env
}
fn default_llm_timeout() -> u64 {
    GenerateConfig::default().timeout_secs
}
fn default_capacity() -> usize {
    1000
}
