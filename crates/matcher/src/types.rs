use index::IndexError;
use semantic::SemanticError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Thresholds used by the [`ConfidenceGate`](crate::ConfidenceGate).
///
/// The defaults are calibrated for `bge-small-en-v1.5` cosine scores, where
/// unrelated text rarely clears 0.10. Other embedding models produce
/// differently distributed scores, so treat these as model-dependent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GateConfig {
    /// Minimum score for a result to count as evidence (inclusive).
    #[serde(default = "GateConfig::default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Scores at or above this are `high` confidence.
    #[serde(default = "GateConfig::default_high_cutoff")]
    pub high_cutoff: f32,
    /// Scores at or above this (and below `high_cutoff`) are `medium`.
    #[serde(default = "GateConfig::default_medium_cutoff")]
    pub medium_cutoff: f32,
}

impl GateConfig {
    pub(crate) fn default_similarity_threshold() -> f32 {
        0.10
    }

    pub(crate) fn default_high_cutoff() -> f32 {
        0.45
    }

    pub(crate) fn default_medium_cutoff() -> f32 {
        0.30
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if !self.similarity_threshold.is_finite() {
            return Err(MatchError::InvalidConfig(
                "similarity_threshold must be finite".into(),
            ));
        }
        if !self.high_cutoff.is_finite() || !self.medium_cutoff.is_finite() {
            return Err(MatchError::InvalidConfig(
                "confidence cutoffs must be finite".into(),
            ));
        }
        if self.high_cutoff <= self.medium_cutoff {
            return Err(MatchError::InvalidConfig(
                "high_cutoff must be greater than medium_cutoff".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: Self::default_similarity_threshold(),
            high_cutoff: Self::default_high_cutoff(),
            medium_cutoff: Self::default_medium_cutoff(),
        }
    }
}

/// Coarse confidence bucket for a score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Bucket `score` using the config's cutoffs. NaN lands in `Low`.
    pub fn from_score(score: f32, cfg: &GateConfig) -> Self {
        if score >= cfg.high_cutoff {
            ConfidenceLevel::High
        } else if score >= cfg.medium_cutoff {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retrieval result tagged by the gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatedResult {
    pub source: String,
    pub content: String,
    pub score: f32,
    pub passed_threshold: bool,
    pub confidence: ConfidenceLevel,
}

/// Verdict for one query's retrieval results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateOutcome {
    /// Every result in ranked order, tagged.
    pub results: Vec<GatedResult>,
    /// Results that cleared the threshold, in ranked order.
    pub valid: Vec<GatedResult>,
    /// Bucket of the mean valid score; `low` when nothing passed.
    pub overall_confidence: ConfidenceLevel,
    /// Mean score of `valid`, `None` when it is empty.
    pub average_score: Option<f32>,
    /// True when no result passed and the caller must not answer.
    pub abstain: bool,
}

impl GateOutcome {
    pub fn retrieval_count(&self) -> usize {
        self.results.len()
    }

    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }
}

/// How many ranked candidates a query pulls from the index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "scope", content = "n", rename_all = "snake_case")]
pub enum SearchScope {
    /// Score the whole corpus and let the threshold decide relevance.
    #[default]
    All,
    /// Keep only the best `n` candidates.
    TopN(usize),
}

impl SearchScope {
    /// Concrete `top_k` for a corpus of `corpus_len` documents.
    pub fn top_k(&self, corpus_len: usize) -> usize {
        match self {
            SearchScope::All => corpus_len,
            SearchScope::TopN(n) => (*n).min(corpus_len),
        }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if let SearchScope::TopN(0) = self {
            return Err(MatchError::InvalidConfig(
                "top_n must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Errors surfaced by retrieval and gating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// The question was empty or whitespace-only.
    #[error("question must not be empty")]
    EmptyQuery,
    /// The question could not be embedded.
    #[error("embedding error: {0}")]
    Embedding(#[from] SemanticError),
    /// Index search failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
    /// Invalid gate or scope configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}
