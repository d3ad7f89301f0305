//! Numeric helpers over asset-aligned `f64` slices.
//!
//! Index `i` always refers to the same asset across every vector passed to
//! these functions; none of them reorder elements.

/// Arithmetic sum of all elements.
#[inline]
pub fn sum(v: &[f64]) -> f64 {
    v.iter().sum()
}

/// Divide every element by the sum of the slice.
///
/// A slice whose sum is zero (or not finite) normalizes to a zero vector of
/// the same length instead of producing NaN or infinity.
pub fn normalize(v: &[f64]) -> Vec<f64> {
    let total = sum(v);
    if total == 0.0 || !total.is_finite() {
        return vec![0.0; v.len()];
    }
    v.iter().map(|x| x / total).collect()
}

/// Multiply every element by `k`.
pub fn scale(v: &[f64], k: f64) -> Vec<f64> {
    v.iter().map(|x| x * k).collect()
}

/// Elementwise product of two aligned slices.
///
/// # Panics
///
/// Panics if the slices differ in length.
#[track_caller]
pub fn elementwise_multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(
        a.len(),
        b.len(),
        "elementwise_multiply: length mismatch ({} vs {})",
        a.len(),
        b.len()
    );
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}
