/// In-place L2 normalization applied to embedder output when `normalize` is set.
/// Zero vectors are left untouched.
pub(crate) fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f64 = v.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    if norm_sq > 0.0 && norm_sq.is_finite() {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x = (f64::from(*x) * inv_norm) as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn l2_normalize_simple_vector() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize_in_place(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn l2_normalize_zero_vector() {
        let mut v = vec![0.0f32, 0.0, 0.0];
        l2_normalize_in_place(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn l2_normalize_empty_slice() {
        let mut v: Vec<f32> = vec![];
        l2_normalize_in_place(&mut v);
        assert!(v.is_empty());
    }

    #[test]
    fn l2_normalize_negative_values() {
        let mut v = vec![-3.0f32, -4.0];
        l2_normalize_in_place(&mut v);
        assert!((v[0] + 0.6).abs() < 1e-6);
        assert!((v[1] + 0.8).abs() < 1e-6);
    }

    #[test]
    fn l2_normalize_idempotent() {
        let mut v = vec![1.0f32, 2.0, 3.0];
        l2_normalize_in_place(&mut v);
        let first = v.clone();
        l2_normalize_in_place(&mut v);
        for (a, b) in v.iter().zip(&first) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
        assert!((norm(&v) - 1.0).abs() < 1e-5);
    }
}
