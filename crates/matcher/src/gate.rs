use index::RetrievalResult;
use tracing::debug;

use crate::types::{ConfidenceLevel, GateConfig, GateOutcome, GatedResult, MatchError};

/// Decides which retrieved documents are trustworthy enough to answer from.
///
/// A result passes when `score >= similarity_threshold`, compared exactly.
/// The gate is pure: it keeps no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceGate {
    config: GateConfig,
}

impl ConfidenceGate {
    pub fn new(config: GateConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn evaluate(&self, results: Vec<RetrievalResult>) -> GateOutcome {
        let cfg = &self.config;
        let results: Vec<GatedResult> = results
            .into_iter()
            .map(|r| GatedResult {
                passed_threshold: r.score >= cfg.similarity_threshold,
                confidence: ConfidenceLevel::from_score(r.score, cfg),
                source: r.source,
                content: r.content,
                score: r.score,
            })
            .collect();

        let valid: Vec<GatedResult> = results
            .iter()
            .filter(|r| r.passed_threshold)
            .cloned()
            .collect();

        let average_score = if valid.is_empty() {
            None
        } else {
            let sum: f64 = valid.iter().map(|r| f64::from(r.score)).sum();
            Some((sum / valid.len() as f64) as f32)
        };

        let overall_confidence = average_score
            .map(|avg| ConfidenceLevel::from_score(avg, cfg))
            .unwrap_or(ConfidenceLevel::Low);
        let abstain = valid.is_empty();

        debug!(
            retrieved = results.len(),
            valid = valid.len(),
            average_score = ?average_score,
            confidence = %overall_confidence,
            abstain,
            "gate evaluated"
        );

        GateOutcome {
            results,
            valid,
            overall_confidence,
            average_score,
            abstain,
        }
    }
}
