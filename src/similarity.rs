//! Windowed similarity curve.
//!
//! Comparing only adjacent units is noisy: one off-topic sentence produces a
//! dip that looks like a topic change. Instead, each boundary is scored by
//! comparing the block of units before it with the block after it.
//!
//! ```text
//! units:     u0  u1  u2 | u3  u4  u5        window_size = 3
//!            \________/   \________/
//!              before       after
//!
//! curve[2] = mean(sim(a, b) for a in {u0,u1,u2}, b in {u3,u4,u5})
//! ```
//!
//! Blocks are clipped at the ends of the sequence. Larger windows reveal
//! broader topic structure but blur the exact position of a boundary.

use crate::{Error, Result};

/// Compute the windowed similarity curve.
///
/// `curve[i]` scores the boundary between unit `i` and unit `i + 1`, so the
/// curve has one entry fewer than `embeddings` (none for fewer than two).
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if `window_size` is zero.
///
/// ```rust
/// use seams::{cosine_similarity, windowed_similarity};
///
/// let a = vec![1.0, 0.0];
/// let b = vec![0.0, 1.0];
/// let embeddings = [a.clone(), a.clone(), b.clone(), b.clone()];
/// let curve = windowed_similarity(&embeddings, 1, cosine_similarity).unwrap();
/// assert_eq!(curve, [1.0, 0.0, 1.0]);
/// ```
pub fn windowed_similarity<F>(
    embeddings: &[Vec<f32>],
    window_size: usize,
    similarity: F,
) -> Result<Vec<f64>>
where
    F: Fn(&[f32], &[f32]) -> f64,
{
    if window_size == 0 {
        return Err(Error::invalid("window_size must be >= 1"));
    }
    let n = embeddings.len();
    if n < 2 {
        return Ok(Vec::new());
    }

    let similarity = &similarity;
    let curve = (0..n - 1)
        .map(|i| {
            let before = &embeddings[(i + 1).saturating_sub(window_size)..=i];
            let after = &embeddings[i + 1..(i + 1 + window_size).min(n)];
            let total: f64 = before
                .iter()
                .flat_map(|a| after.iter().map(move |b| similarity(a.as_slice(), b.as_slice())))
                .sum();
            total / (before.len() * after.len()) as f64
        })
        .collect();

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosine_similarity;

    fn axis(i: usize, dim: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[i] = 1.0;
        v
    }

    #[test]
    fn test_length() {
        let embeddings: Vec<Vec<f32>> = (0..6).map(|_| axis(0, 2)).collect();
        let curve = windowed_similarity(&embeddings, 3, cosine_similarity).unwrap();
        assert_eq!(curve.len(), 5);
        assert!(curve.iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_short_sequences() {
        assert!(windowed_similarity(&[], 3, cosine_similarity)
            .unwrap()
            .is_empty());
        assert!(windowed_similarity(&[axis(0, 2)], 3, cosine_similarity)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = windowed_similarity(&[axis(0, 2), axis(1, 2)], 0, cosine_similarity);
        assert!(matches!(err, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_window_averages_blocks() {
        // Topic A for three units, topic B for three units.
        let embeddings = [
            axis(0, 2),
            axis(0, 2),
            axis(0, 2),
            axis(1, 2),
            axis(1, 2),
            axis(1, 2),
        ];
        let curve = windowed_similarity(&embeddings, 2, cosine_similarity).unwrap();
        // Boundary 1: before {0,1}, after {2,3} -> 2 of 4 pairs similar.
        assert!((curve[1] - 0.5).abs() < 1e-12);
        // Boundary 2 sits exactly between the topics.
        assert!(curve[2].abs() < 1e-12);
        let min = curve.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(curve[2], min);
    }

    #[test]
    fn test_window_clipped_at_edges() {
        let embeddings = [axis(0, 2), axis(1, 2), axis(1, 2)];
        // Boundary 0: before {0}, after {1,2}.
        let curve = windowed_similarity(&embeddings, 5, cosine_similarity).unwrap();
        assert!(curve[0].abs() < 1e-12);
        // Boundary 1: before {0,1}, after {2} -> one of two pairs similar.
        assert!((curve[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_custom_similarity() {
        let embeddings = [axis(0, 2), axis(1, 2)];
        let curve = windowed_similarity(&embeddings, 1, |_, _| 0.25).unwrap();
        assert_eq!(curve, [0.25]);
    }
}
