//! In-process query log and the summary derived from it.
//!
//! Recent entries live in a bounded ring buffer; totals cover the whole
//! process lifetime so evicted entries still count. Nothing is persisted.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use matcher::ConfidenceLevel;
use serde::{Deserialize, Serialize};

/// How a query ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Evidence passed the gate and an answer was generated.
    Answered,
    /// No evidence passed the gate.
    Abstained,
    /// Retrieval or generation returned an error.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryLogEntry {
    pub question: String,
    pub success: bool,
    pub outcome: QueryOutcome,
    /// `None` when retrieval itself failed.
    pub confidence: Option<ConfidenceLevel>,
    pub retrieval_time_ms: Option<f64>,
    pub retrieval_count: usize,
    pub valid_count: usize,
    pub timestamp: DateTime<Utc>,
}

/// Count of logged queries per overall confidence bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfidenceDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ConfidenceDistribution {
    fn record(&mut self, level: ConfidenceLevel) {
        match level {
            ConfidenceLevel::High => self.high += 1,
            ConfidenceLevel::Medium => self.medium += 1,
            ConfidenceLevel::Low => self.low += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    pub total_queries: usize,
    pub answered: usize,
    pub abstained: usize,
    pub failed: usize,
    /// `answered / (answered + failed)`; abstentions are excluded. 0 when no
    /// query was answered or failed.
    pub success_rate: f64,
    /// Mean over queries that completed retrieval, rounded to 2 decimals.
    pub average_retrieval_time_ms: f64,
    pub confidence_distribution: ConfidenceDistribution,
    /// Newest first.
    pub recent_queries: Vec<QueryLogEntry>,
}

#[derive(Debug, Default)]
struct Totals {
    total: usize,
    answered: usize,
    abstained: usize,
    failed: usize,
    timed: usize,
    retrieval_ms_sum: f64,
    confidence: ConfidenceDistribution,
}

#[derive(Debug)]
struct LogState {
    entries: VecDeque<QueryLogEntry>,
    totals: Totals,
}

/// Thread-safe bounded query log.
#[derive(Debug)]
pub struct QueryLog {
    capacity: usize,
    state: Mutex<LogState>,
}

impl QueryLog {
    /// A log keeping at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: Mutex::new(LogState {
                entries: VecDeque::with_capacity(capacity.min(1024)),
                totals: Totals::default(),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, entry: QueryLogEntry) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let totals = &mut state.totals;
        totals.total += 1;
        match entry.outcome {
            QueryOutcome::Answered => totals.answered += 1,
            QueryOutcome::Abstained => totals.abstained += 1,
            QueryOutcome::Failed => totals.failed += 1,
        }
        if let Some(ms) = entry.retrieval_time_ms {
            totals.timed += 1;
            totals.retrieval_ms_sum += ms;
        }
        if let Some(level) = entry.confidence {
            totals.confidence.record(level);
        }

        if state.entries.len() == self.capacity {
            state.entries.pop_front();
        }
        state.entries.push_back(entry);
    }

    /// Entries currently held, up to `capacity`.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summary over the whole lifetime plus the `recent` newest entries.
    pub fn summary(&self, recent: usize) -> AnalyticsSummary {
        let state = self.lock();
        let totals = &state.totals;

        let decided = totals.answered + totals.failed;
        let success_rate = if decided == 0 {
            0.0
        } else {
            totals.answered as f64 / decided as f64
        };
        let average_retrieval_time_ms = if totals.timed == 0 {
            0.0
        } else {
            crate::response::round_to(totals.retrieval_ms_sum / totals.timed as f64, 2)
        };

        AnalyticsSummary {
            total_queries: totals.total,
            answered: totals.answered,
            abstained: totals.abstained,
            failed: totals.failed,
            success_rate,
            average_retrieval_time_ms,
            confidence_distribution: totals.confidence,
            recent_queries: state.entries.iter().rev().take(recent).cloned().collect(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LogState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(question: &str, outcome: QueryOutcome, ms: Option<f64>) -> QueryLogEntry {
        let confidence = match outcome {
            QueryOutcome::Answered => Some(ConfidenceLevel::High),
            QueryOutcome::Abstained => Some(ConfidenceLevel::Low),
            QueryOutcome::Failed => None,
        };
        QueryLogEntry {
            question: question.into(),
            success: outcome == QueryOutcome::Answered,
            outcome,
            confidence,
            retrieval_time_ms: ms,
            retrieval_count: 1,
            valid_count: usize::from(outcome == QueryOutcome::Answered),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_log_summary() {
        let log = QueryLog::new(10);
        let summary = log.summary(5);
        assert!(log.is_empty());
        assert_eq!(summary.total_queries, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.average_retrieval_time_ms, 0.0);
        assert!(summary.recent_queries.is_empty());
    }

    #[test]
    fn counts_outcomes_and_rates() {
        let log = QueryLog::new(10);
        log.record(entry("a", QueryOutcome::Answered, Some(2.0)));
        log.record(entry("b", QueryOutcome::Abstained, Some(4.0)));
        log.record(entry("c", QueryOutcome::Failed, None));
        log.record(entry("d", QueryOutcome::Answered, Some(3.0)));

        let summary = log.summary(10);
        assert_eq!(summary.total_queries, 4);
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.abstained, 1);
        assert_eq!(summary.failed, 1);
        // The abstention counts toward neither side: 2 answered of 3 decided.
        assert!((summary.success_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.average_retrieval_time_ms, 3.0);
        assert_eq!(
            summary.confidence_distribution,
            ConfidenceDistribution {
                high: 2,
                medium: 0,
                low: 1
            }
        );
    }

    #[test]
    fn abstentions_do_not_lower_success_rate() {
        let log = QueryLog::new(10);
        log.record(entry("a", QueryOutcome::Answered, Some(1.0)));
        log.record(entry("b", QueryOutcome::Abstained, Some(1.0)));
        assert_eq!(log.summary(0).success_rate, 1.0);

        log.record(entry("c", QueryOutcome::Failed, None));
        assert_eq!(log.summary(0).success_rate, 0.5);
    }

    #[test]
    fn only_abstentions_give_zero_rate() {
        let log = QueryLog::new(10);
        log.record(entry("a", QueryOutcome::Abstained, Some(1.0)));
        let summary = log.summary(0);
        assert_eq!(summary.abstained, 1);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn ring_buffer_evicts_oldest_but_keeps_totals() {
        let log = QueryLog::new(2);
        for q in ["first", "second", "third"] {
            log.record(entry(q, QueryOutcome::Abstained, Some(1.0)));
        }
        assert_eq!(log.len(), 2);

        let summary = log.summary(10);
        assert_eq!(summary.total_queries, 3);
        let questions: Vec<_> = summary
            .recent_queries
            .iter()
            .map(|e| e.question.as_str())
            .collect();
        assert_eq!(questions, vec!["third", "second"]);
    }

    #[test]
    fn recent_is_limited() {
        let log = QueryLog::new(10);
        for q in ["a", "b", "c"] {
            log.record(entry(q, QueryOutcome::Answered, Some(1.0)));
        }
        let summary = log.summary(1);
        assert_eq!(summary.recent_queries.len(), 1);
        assert_eq!(summary.recent_queries[0].question, "c");
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let log = QueryLog::new(0);
        assert_eq!(log.capacity(), 1);
        log.record(entry("a", QueryOutcome::Answered, None));
        log.record(entry("b", QueryOutcome::Answered, None));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn outcome_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&QueryOutcome::Abstained).unwrap(),
            "\"abstained\""
        );
    }
}
