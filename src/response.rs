//! Structured answers returned by [`Pipeline::answer_question`](crate::Pipeline::answer_question).

use matcher::{ConfidenceLevel, GateOutcome, GatedResult};
use serde::{Deserialize, Serialize};

/// Answer text returned verbatim whenever the gate abstains.
pub const ABSTENTION_MESSAGE: &str = "This question is not related to the provided documents.";

/// One ranked document as reported to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedDocument {
    pub filename: String,
    /// Cosine score rounded to 4 decimals.
    pub score: f64,
    pub passed_threshold: bool,
    pub confidence: ConfidenceLevel,
    pub content: String,
}

impl From<&GatedResult> for RetrievedDocument {
    fn from(result: &GatedResult) -> Self {
        Self {
            filename: result.source.clone(),
            score: round_to(f64::from(result.score), 4),
            passed_threshold: result.passed_threshold,
            confidence: result.confidence,
            content: result.content.clone(),
        }
    }
}

/// Retrieval-phase facts for one query, available even when generation fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalDiagnostics {
    pub question: String,
    pub confidence: ConfidenceLevel,
    pub similarity_threshold: f32,
    pub retrieval_time_ms: f64,
    pub retrieval_count: usize,
    pub valid_count: usize,
    pub retrieved_documents: Vec<RetrievedDocument>,
}

impl RetrievalDiagnostics {
    pub(crate) fn new(
        question: &str,
        outcome: &GateOutcome,
        similarity_threshold: f32,
        retrieval_time_ms: f64,
    ) -> Self {
        Self {
            question: question.to_string(),
            confidence: outcome.overall_confidence,
            similarity_threshold,
            retrieval_time_ms,
            retrieval_count: outcome.retrieval_count(),
            valid_count: outcome.valid_count(),
            retrieved_documents: outcome.results.iter().map(RetrievedDocument::from).collect(),
        }
    }
}

/// Response for a question that was either answered or refused.
///
/// Serializes to the flat JSON shape clients consume:
/// `{success, question, answer, confidence, similarity_threshold,
/// retrieval_time_ms, retrieval_count, valid_count, retrieved_documents}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerResponse {
    /// False when the gate abstained.
    pub success: bool,
    pub question: String,
    pub answer: String,
    pub confidence: ConfidenceLevel,
    pub similarity_threshold: f32,
    /// Embed, search and gate time in milliseconds, rounded to 2 decimals.
    pub retrieval_time_ms: f64,
    pub retrieval_count: usize,
    pub valid_count: usize,
    pub retrieved_documents: Vec<RetrievedDocument>,
}

impl AnswerResponse {
    pub(crate) fn answered(diagnostics: RetrievalDiagnostics, answer: String) -> Self {
        Self::from_parts(true, diagnostics, answer)
    }

    pub(crate) fn abstained(diagnostics: RetrievalDiagnostics) -> Self {
        Self::from_parts(false, diagnostics, ABSTENTION_MESSAGE.to_string())
    }

    fn from_parts(success: bool, d: RetrievalDiagnostics, answer: String) -> Self {
        Self {
            success,
            question: d.question,
            answer,
            confidence: d.confidence,
            similarity_threshold: d.similarity_threshold,
            retrieval_time_ms: d.retrieval_time_ms,
            retrieval_count: d.retrieval_count,
            valid_count: d.valid_count,
            retrieved_documents: d.retrieved_documents,
        }
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.123_456, 4), 0.1235);
        assert_eq!(round_to(12.345_6, 2), 12.35);
        assert_eq!(round_to(-0.000_04, 4), -0.0);
    }

    #[test]
    fn retrieved_document_from_gated_result() {
        let gated = GatedResult {
            source: "log1.txt".into(),
            content: "The car was red.".into(),
            score: 0.512_345,
            passed_threshold: true,
            confidence: ConfidenceLevel::High,
        };
        let doc = RetrievedDocument::from(&gated);
        assert_eq!(doc.filename, "log1.txt");
        assert_eq!(doc.score, 0.5123);
        assert!(doc.passed_threshold);
    }

    #[test]
    fn abstained_response_uses_fixed_message() {
        let diagnostics = RetrievalDiagnostics {
            question: "Hello?".into(),
            confidence: ConfidenceLevel::Low,
            similarity_threshold: 0.1,
            retrieval_time_ms: 0.42,
            retrieval_count: 1,
            valid_count: 0,
            retrieved_documents: Vec::new(),
        };
        let response = AnswerResponse::abstained(diagnostics);
        assert!(!response.success);
        assert_eq!(response.answer, ABSTENTION_MESSAGE);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["confidence"], "low");
        assert_eq!(json["valid_count"], 0);
        assert_eq!(json["retrieved_documents"], serde_json::json!([]));
    }
}
