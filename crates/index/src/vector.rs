//! Numeric helpers shared by index construction and search.
//!
//! Norms are accumulated in `f64` so that large-but-finite `f32` components
//! cannot overflow the sum of squares. A vector whose norm is zero is left
//! untouched; it then scores `0.0` against everything instead of producing
//! `NaN`.

/// L2 norm of `v`, accumulated in double precision.
#[inline]
pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

/// Scale `v` to unit length in place.
///
/// Returns `false` (and leaves `v` unchanged) when the vector has zero norm.
pub fn normalize_in_place(v: &mut [f32]) -> bool {
    let norm = l2_norm(v);
    if norm == 0.0 || !norm.is_finite() {
        return false;
    }
    let inv = norm.recip();
    for x in v.iter_mut() {
        *x = (f64::from(*x) * inv) as f32;
    }
    true
}

/// Cosine similarity between two raw vectors.
///
/// Mismatched lengths, empty input, and zero-norm vectors all yield `0.0`.
/// The result is clamped into `[-1, 1]` to absorb rounding.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    clamp_score((dot / (norm_a * norm_b)) as f32)
}

/// Clamp a similarity into `[-1, 1]` and fold `-0.0` into `0.0`.
#[inline]
pub(crate) fn clamp_score(score: f32) -> f32 {
    (score + 0.0).clamp(-1.0, 1.0)
}
