//! # evidence-qa
//!
//! Answer questions from a directory of text files, or abstain when nothing
//! in the corpus is relevant.
//!
//! Usage:
//!   evidence-qa ask "What color was the car?"
//!   evidence-qa --data-dir ./logs --threshold 0.2 ask "Who arrived first?"
//!   evidence-qa stats < questions.txt

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use evidence_qa::{EvidenceConfig, Pipeline, PipelineError};
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "evidence-qa",
    version,
    about = "Evidence-grounded question answering with abstention"
)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of documents to index (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Similarity threshold for evidence (overrides the config)
    #[arg(long, global = true)]
    threshold: Option<f32>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one or more questions and print a JSON response for each
    Ask {
        #[arg(required = true)]
        questions: Vec<String>,
    },
    /// Answer questions read from stdin, one per line, then print analytics
    Stats {
        /// Number of recent queries to include
        #[arg(long, default_value = "10")]
        recent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = load_config(&cli)?;
    let pipeline = Pipeline::from_config(config)
        .await
        .context("failed to start pipeline")?;

    match cli.command {
        Command::Ask { questions } => {
            let mut failures = 0usize;
            for question in &questions {
                if !ask(&pipeline, question).await? {
                    failures += 1;
                }
            }
            if failures > 0 {
                anyhow::bail!("{failures} of {} questions failed", questions.len());
            }
        }
        Command::Stats { recent } => {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("failed to read stdin")?;
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if let Err(err) = pipeline.answer_question(question).await {
                    warn!(question, error = %err, "query failed");
                }
            }
            println!("{}", serde_json::to_string_pretty(&pipeline.analytics(recent))?);
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli) -> Result<EvidenceConfig> {
    let mut config = match &cli.config {
        Some(path) => EvidenceConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => EvidenceConfig::default(),
    };
    config.apply_env_overrides(|key| std::env::var(key).ok())?;

    if let Some(dir) = &cli.data_dir {
        config.ingest.data_dir = dir.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.gate.similarity_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

/// Print the response for `question`; returns whether the query completed.
async fn ask(pipeline: &Pipeline, question: &str) -> Result<bool> {
    match pipeline.answer_question(question).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(true)
        }
        Err(PipelineError::Generation {
            source,
            diagnostics,
        }) => {
            let body = json!({
                "success": false,
                "error": source.to_string(),
                "question": diagnostics.question,
                "confidence": diagnostics.confidence,
                "similarity_threshold": diagnostics.similarity_threshold,
                "retrieval_time_ms": diagnostics.retrieval_time_ms,
                "retrieval_count": diagnostics.retrieval_count,
                "valid_count": diagnostics.valid_count,
                "retrieved_documents": diagnostics.retrieved_documents,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(false)
        }
        Err(err) => {
            let body = json!({
                "success": false,
                "question": question,
                "error": err.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(false)
        }
    }
}
