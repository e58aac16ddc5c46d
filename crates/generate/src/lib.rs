//! Answer generation for evidence-grounded QA.
//!
//! The [`Generator`] trait is the seam the pipeline calls once it has
//! evidence worth answering from. [`ChatCompletionsGenerator`] implements it
//! for OpenAI-compatible endpoints and defaults to Groq's
//! `llama-3.1-8b-instant`.
//!
//! ```no_run
//! use generate::{ChatCompletionsGenerator, GenerateConfig, Generator};
//!
//! # async fn run() -> Result<(), generate::GenerateError> {
//! let generator = ChatCompletionsGenerator::from_env(GenerateConfig::default())?;
//! let answer = generator.generate("Say hello.").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

mod chat;
mod config;
mod error;

pub use crate::chat::{build_request_body, parse_completion, ChatCompletionsGenerator};
pub use crate::config::GenerateConfig;
pub use crate::error::GenerateError;

use async_trait::async_trait;

/// Turns a fully built prompt into answer text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Label of the underlying model, for logs.
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
