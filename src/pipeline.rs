//! Startup and per-query orchestration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use generate::{ChatCompletionsGenerator, GenerateError, Generator};
use index::{Document, VectorIndex};
use ingest::SourceDocument;
use matcher::{ConfidenceGate, GateConfig, Retriever, SearchScope};
use semantic::{Embedder, SemanticError};
use tracing::{debug, info, warn};

use crate::analytics::{AnalyticsSummary, QueryLog, QueryLogEntry, QueryOutcome};
use crate::config::EvidenceConfig;
use crate::error::PipelineError;
use crate::prompt::build_prompt;
use crate::response::{round_to, AnswerResponse, RetrievalDiagnostics};

/// A ready-to-query evidence pipeline over one fixed corpus.
///
/// Everything except the query log is immutable after startup, so a single
/// `Arc<Pipeline>` can serve concurrent questions.
pub struct Pipeline {
    config: EvidenceConfig,
    retriever: Retriever,
    gate: ConfidenceGate,
    scope: SearchScope,
    generator: Arc<dyn Generator>,
    generation_timeout: Option<Duration>,
    log: QueryLog,
}

impl Pipeline {
    /// Load the configured directory, embed every document and build the index.
    pub async fn initialize(
        config: EvidenceConfig,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let documents = ingest::load_documents(&config.ingest_config())?;
        Self::from_documents(config, documents, embedder, generator).await
    }

    /// Build collaborators from `config` (embedder by `semantic.mode`, generator
    /// with its key read from `generate.api_key_env`) and start up.
    pub async fn from_config(config: EvidenceConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let embedder = semantic::from_config(&config.semantic_config())?;
        let generator = ChatCompletionsGenerator::from_env(config.generate_config())
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        if !generator.has_credentials() {
            warn!(
                env = %config.generate.api_key_env,
                "no generation API key set; answerable questions will fail"
            );
        }
        Self::initialize(config, embedder, Arc::new(generator)).await
    }

    /// Start up from documents the caller already holds.
    pub async fn from_documents(
        config: EvidenceConfig,
        documents: Vec<SourceDocument>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        if documents.is_empty() {
            return Err(PipelineError::EmptyCorpus);
        }

        let started = Instant::now();
        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let embeddings = embedder.embed_many(&texts).await?;
        if embeddings.len() != documents.len() {
            return Err(PipelineError::Embedding(SemanticError::Inference(format!(
                "embedder returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            ))));
        }

        let index = VectorIndex::build(
            documents
                .into_iter()
                .zip(embeddings)
                .map(|(doc, embedding)| Document::new(doc.source, doc.content, embedding)),
        )?;

        info!(
            documents = index.len(),
            dimension = index.dimension(),
            model = embedder.model_name(),
            generator = generator.model_name(),
            elapsed_micros = started.elapsed().as_micros() as u64,
            "evidence index ready"
        );

        let gate = ConfidenceGate::new(config.gate)
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        let scope = config.search_scope()?;
        let generation_timeout = config.generation_timeout();
        let log = QueryLog::new(config.analytics.capacity);

        Ok(Self {
            retriever: Retriever::new(embedder, Arc::new(index)),
            gate,
            scope,
            generator,
            generation_timeout,
            log,
            config,
        })
    }

    /// Replace the generation deadline taken from the config.
    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn config(&self) -> &EvidenceConfig {
        &self.config
    }

    pub fn gate_config(&self) -> &GateConfig {
        self.gate.config()
    }

    pub fn document_count(&self) -> usize {
        self.retriever.index().len()
    }

    /// Answer `question` from the corpus, or abstain when nothing relevant
    /// clears the similarity threshold.
    pub async fn answer_question(&self, question: &str) -> Result<AnswerResponse, PipelineError> {
        let started = Instant::now();
        let top_k = self.scope.top_k(self.document_count());

        let results = match self.retriever.search(question, top_k).await {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "retrieval failed");
                self.log.record(QueryLogEntry {
                    question: question.to_string(),
                    success: false,
                    outcome: QueryOutcome::Failed,
                    confidence: None,
                    retrieval_time_ms: None,
                    retrieval_count: 0,
                    valid_count: 0,
                    timestamp: Utc::now(),
                });
                return Err(err.into());
            }
        };
        let outcome = self.gate.evaluate(results);
        let retrieval_time_ms = round_to(started.elapsed().as_secs_f64() * 1000.0, 2);

        let threshold = self.gate.config().similarity_threshold;
        let diagnostics = RetrievalDiagnostics::new(question, &outcome, threshold, retrieval_time_ms);

        debug!(
            retrieval_count = diagnostics.retrieval_count,
            valid_count = diagnostics.valid_count,
            average_score = outcome.average_score,
            confidence = %outcome.overall_confidence,
            retrieval_time_ms,
            "evidence gated"
        );

        if outcome.abstain {
            warn!(
                best_score = outcome.results.first().map(|r| r.score),
                threshold, "no evidence above threshold; abstaining"
            );
            self.record(&diagnostics, QueryOutcome::Abstained);
            return Ok(AnswerResponse::abstained(diagnostics));
        }

        let prompt = build_prompt(question, &outcome.valid);
        match self.generate(&prompt).await {
            Ok(answer) => {
                info!(
                    confidence = %diagnostics.confidence,
                    valid_count = diagnostics.valid_count,
                    "question answered"
                );
                self.record(&diagnostics, QueryOutcome::Answered);
                Ok(AnswerResponse::answered(diagnostics, answer))
            }
            Err(source) => {
                warn!(error = %source, "answer generation failed");
                self.record(&diagnostics, QueryOutcome::Failed);
                Err(PipelineError::Generation {
                    source,
                    diagnostics: Box::new(diagnostics),
                })
            }
        }
    }

    /// Lifetime totals plus the `recent` newest log entries.
    pub fn analytics(&self, recent: usize) -> AnalyticsSummary {
        self.log.summary(recent)
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        match self.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, self.generator.generate(prompt))
                .await
                .map_err(|_| GenerateError::Timeout(limit))?,
            None => self.generator.generate(prompt).await,
        }
    }

    fn record(&self, diagnostics: &RetrievalDiagnostics, outcome: QueryOutcome) {
        self.log.record(QueryLogEntry {
            question: diagnostics.question.clone(),
            success: outcome == QueryOutcome::Answered,
            outcome,
            confidence: Some(diagnostics.confidence),
            retrieval_time_ms: Some(diagnostics.retrieval_time_ms),
            retrieval_count: diagnostics.retrieval_count,
            valid_count: diagnostics.valid_count,
            timestamp: Utc::now(),
        });
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("retriever", &self.retriever)
            .field("gate", self.gate.config())
            .field("scope", &self.scope)
            .field("generator", &self.generator.model_name())
            .field("generation_timeout", &self.generation_timeout)
            .finish()
    }
}
