use serde::{Deserialize, Serialize};

use crate::GenerateError;

/// Settings for an OpenAI-compatible chat-completions endpoint.
///
/// The API key itself is never part of the config; only the name of the
/// environment variable that holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Base URL, e.g. `https://api.groq.com/openai/v1`.
    pub api_url: String,
    /// Path appended to `api_url` for completions.
    pub chat_path: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1".into(),
            chat_path: "/chat/completions".into(),
            model: "llama-3.1-8b-instant".into(),
            temperature: 0.2,
            max_tokens: 800,
            api_key_env: "GROQ_API_KEY".into(),
            timeout_secs: 60,
        }
    }
}

impl GenerateConfig {
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.api_url.trim().is_empty() {
            return Err(GenerateError::InvalidConfig("api_url must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(GenerateError::InvalidConfig("model must not be empty".into()));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(GenerateError::InvalidConfig(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(GenerateError::InvalidConfig("max_tokens must be >= 1".into()));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(GenerateError::InvalidConfig(
                "api_key_env must name an environment variable".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(GenerateError::InvalidConfig("timeout_secs must be >= 1".into()));
        }
        Ok(())
    }

    /// Full completions URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_groq() {
        let cfg = GenerateConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.model, "llama-3.1-8b-instant");
        assert_eq!(cfg.max_tokens, 800);
        assert_eq!(cfg.api_key_env, "GROQ_API_KEY");
        assert_eq!(
            cfg.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let cfg = GenerateConfig {
            api_url: "http://localhost:11434/v1/".into(),
            chat_path: "chat/completions".into(),
            ..GenerateConfig::default()
        };
        assert_eq!(cfg.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn invalid_values_rejected() {
        for cfg in [
            GenerateConfig {
                temperature: 3.0,
                ..GenerateConfig::default()
            },
            GenerateConfig {
                max_tokens: 0,
                ..GenerateConfig::default()
            },
            GenerateConfig {
                model: " ".into(),
                ..GenerateConfig::default()
            },
            GenerateConfig {
                timeout_secs: 0,
                ..GenerateConfig::default()
            },
        ] {
            assert!(matches!(cfg.validate(), Err(GenerateError::InvalidConfig(_))));
        }
    }
}
