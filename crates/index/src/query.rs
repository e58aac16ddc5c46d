use crate::vector::{clamp_score, normalize_in_place};
use crate::{IndexError, VectorIndex};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Result entry for a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Identifier of the matched document.
    pub source: String,
    /// Text of the matched document.
    pub content: String,
    /// Cosine similarity in `[-1, 1]`, higher is more similar.
    pub score: f32,
    /// Insertion position of the document inside the index.
    pub position: usize,
}

impl VectorIndex {
    /// Score every document against `query` and return the `top_k` best.
    ///
    /// `top_k` is clamped to the corpus size. Results are ordered by
    /// descending cosine similarity; equal scores keep insertion order.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievalResult>, IndexError> {
        let expected = self.dimension();
        if query.len() != expected {
            return Err(IndexError::QueryDimensionMismatch {
                expected,
                found: query.len(),
            });
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(IndexError::NonFiniteQuery);
        }

        let top_k = top_k.min(self.len());
        if top_k == 0 {
            return Ok(Vec::new());
        }

        // A zero query stays all-zero and every score comes out as 0.0.
        let mut normalized = query.to_vec();
        normalize_in_place(&mut normalized);
        let scores = self.embeddings.dot(&ArrayView1::from(&normalized[..]));

        let mut ranked: Vec<(usize, f32)> = scores
            .iter()
            .enumerate()
            .map(|(position, &score)| (position, clamp_score(score)))
            .collect();

        // `sort_by` is stable, so ties stay in insertion order.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.truncate(top_k);

        Ok(ranked
            .into_iter()
            .map(|(position, score)| {
                let doc = &self.documents[position];
                RetrievalResult {
                    source: doc.source.clone(),
                    content: doc.content.clone(),
                    score,
                    position,
                }
            })
            .collect())
    }

    /// Score every document; equivalent to `search(query, self.len())`.
    pub fn search_all(&self, query: &[f32]) -> Result<Vec<RetrievalResult>, IndexError> {
        self.search(query, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cosine_similarity, Document};

    fn seed_index(docs: Vec<(&str, Vec<f32>)>) -> VectorIndex {
        VectorIndex::build(
            docs.into_iter()
                .map(|(source, embedding)| Document::new(source, format!("text {source}"), embedding)),
        )
        .expect("index init")
    }

    #[test]
    fn search_orders_by_score_and_keeps_insertion_order_on_ties() {
        let index = seed_index(vec![
            ("doc-b", vec![5.0, 0.0, 0.0, 0.0]),
            ("doc-a", vec![5.0, 0.0, 0.0, 0.0]),
            ("doc-c", vec![1.0, 1.0, 1.0, 1.0]),
        ]);

        let hits = index.search(&[5.0, 0.0, 0.0, 0.0], 3).expect("search");
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].source, "doc-b");
        assert_eq!(hits[1].source, "doc-a");
        assert_eq!(hits[2].source, "doc-c");
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[1].position, 1);
    }

    #[test]
    fn scores_are_non_increasing() {
        let index = seed_index(vec![
            ("a", vec![0.1, 0.9, 0.3]),
            ("b", vec![0.8, 0.1, 0.2]),
            ("c", vec![-0.5, 0.2, 0.9]),
            ("d", vec![0.4, 0.4, 0.4]),
            ("e", vec![-1.0, -1.0, 0.0]),
        ]);

        let hits = index.search_all(&[0.7, 0.2, 0.1]).expect("search");
        assert_eq!(hits.len(), 5);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(hits.iter().all(|h| (-1.0..=1.0).contains(&h.score)));
    }

    #[test]
    fn own_embedding_ranks_first_with_unit_score() {
        let index = seed_index(vec![
            ("a", vec![0.2, 0.7, 0.1]),
            ("b", vec![0.9, 0.05, 0.3]),
            ("c", vec![0.3, 0.3, 0.9]),
        ]);

        let hits = index.search(&[0.9, 0.05, 0.3], 3).expect("search");
        assert_eq!(hits[0].source, "b");
        assert!((hits[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn matrix_scores_agree_with_pairwise_cosine() {
        let docs = vec![
            ("a", vec![0.1, 0.9, 0.3]),
            ("b", vec![0.8, 0.1, 0.2]),
            ("c", vec![-0.5, 0.2, 0.9]),
            ("zero", vec![0.0, 0.0, 0.0]),
        ];
        let index = seed_index(docs.clone());
        let query = [0.7, -0.2, 0.4];

        for hit in index.search_all(&query).expect("search") {
            let expected = cosine_similarity(&docs[hit.position].1, &query);
            assert!(
                (hit.score - expected).abs() < 1e-5,
                "{}: {} vs {}",
                hit.source,
                hit.score,
                expected
            );
        }
    }

    #[test]
    fn scale_of_the_query_does_not_change_scores() {
        let index = seed_index(vec![("a", vec![1.0, 2.0]), ("b", vec![2.0, -1.0])]);
        let small = index.search_all(&[0.3, 0.4]).expect("search");
        let large = index.search_all(&[300.0, 400.0]).expect("search");
        for (s, l) in small.iter().zip(&large) {
            assert_eq!(s.source, l.source);
            assert!((s.score - l.score).abs() < 1e-6);
        }
    }

    #[test]
    fn top_k_is_clamped_to_corpus_size() {
        let index = seed_index(vec![("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]);

        let hits = index.search(&[1.0, 1.0], 50).expect("search");
        assert_eq!(hits.len(), 2);
        assert_ne!(hits[0].source, hits[1].source);
    }

    #[test]
    fn top_k_truncates_to_best_results() {
        let index = seed_index(vec![
            ("a", vec![1.0, 0.0]),
            ("b", vec![0.0, 1.0]),
            ("c", vec![0.7, 0.7]),
        ]);

        let hits = index.search(&[0.0, 1.0], 1).expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, "b");
    }

    #[test]
    fn zero_top_k_short_circuits() {
        let index = seed_index(vec![("a", vec![1.0, 0.0])]);
        let hits = index.search(&[1.0, 0.0], 0).expect("search");
        assert!(hits.is_empty());
    }

    #[test]
    fn zero_query_scores_zero_everywhere() {
        let index = seed_index(vec![("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]);
        let hits = index.search_all(&[0.0, 0.0]).expect("search");
        assert!(hits.iter().all(|h| h.score == 0.0));
        // All tied, so insertion order wins.
        assert_eq!(hits[0].source, "a");
        assert_eq!(hits[1].source, "b");
    }

    #[test]
    fn zero_document_scores_zero() {
        let index = seed_index(vec![("empty", vec![0.0, 0.0]), ("real", vec![1.0, 1.0])]);
        let hits = index.search_all(&[1.0, 1.0]).expect("search");
        assert_eq!(hits[0].source, "real");
        assert_eq!(hits[1].source, "empty");
        assert_eq!(hits[1].score, 0.0);
        assert!(!hits[1].score.is_nan());
    }

    #[test]
    fn query_dimension_must_match() {
        let index = seed_index(vec![("a", vec![1.0, 0.0, 0.0])]);
        let err = index.search(&[1.0, 0.0], 1).unwrap_err();
        assert_eq!(
            err,
            IndexError::QueryDimensionMismatch {
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn non_finite_query_is_rejected() {
        let index = seed_index(vec![("a", vec![1.0, 0.0])]);
        let err = index.search(&[f32::INFINITY, 0.0], 1).unwrap_err();
        assert_eq!(err, IndexError::NonFiniteQuery);
    }

    #[test]
    fn search_results_serialize_to_json() {
        let index = seed_index(vec![("log1.txt", vec![1.0, 0.0])]);
        let hits = index.search_all(&[1.0, 0.0]).expect("search");
        let json = serde_json::to_value(&hits[0]).expect("serialize");
        assert_eq!(json["source"], "log1.txt");
        assert_eq!(json["position"], 0);
    }
}
