//! Boundary detection on the similarity curve.
//!
//! ## The Idea
//!
//! Topic changes show up as valleys in the windowed similarity curve. A
//! Savitzky–Golay filter gives low-noise estimates of the curve's first and
//! second derivatives; valleys are where the first derivative crosses zero
//! while the second is positive.
//!
//! ```text
//! similarity
//!   0.9 ─╮      ╭──╮        ╭──
//!        ╰╮    ╭╯  ╰╮      ╭╯
//!   0.5   ╰─╮╭─╯    ╰─╮╭──╯
//!           ╰╯         ╰╯          dy = 0, ddy > 0
//!           ↑          ↑
//!        boundary   boundary
//! ```
//!
//! ## Significance Filter
//!
//! Every wobble in the curve has a local minimum. Only minima whose value is
//! below the `q`-th percentile of the *whole* curve survive, so shallow dips
//! inside a topic are ignored. If nothing survives, the set is empty and the
//! document is reconstructed as a single partition.

use crate::savgol::SavitzkyGolay;
use crate::{Error, Result};

/// Derivative magnitudes at or below this are treated as zero.
const ZERO_TOLERANCE: f64 = 1e-12;

/// A zero crossing of the curve's first derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryCandidate {
    /// Fractional curve index where the derivative is zero.
    pub position: f64,
    /// Curve value interpolated at `position`.
    pub value: f64,
    /// Whether the second derivative is positive there.
    pub is_minimum: bool,
}

impl BoundaryCandidate {
    /// Nearest curve index, clipped to a curve of `len` entries.
    pub fn curve_index(&self, len: usize) -> usize {
        let last = len.saturating_sub(1) as f64;
        self.position.round().clamp(0.0, last) as usize
    }

    /// Index of the first unit after the boundary, for a curve of `len`
    /// entries. Curve entry `i` sits between units `i` and `i + 1`.
    pub fn unit_index(&self, len: usize) -> usize {
        self.curve_index(len) + 1
    }
}

/// Result of boundary detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    /// Every zero crossing found, minima and maxima.
    pub candidates: Vec<BoundaryCandidate>,
    /// Percentile value minima had to fall below, if the curve was non-empty.
    pub threshold: Option<f64>,
    /// Unit indices that start a new partition. Strictly increasing.
    pub indices: Vec<usize>,
}

impl BoundarySet {
    /// Whether no boundary survived filtering.
    pub fn is_degenerate(&self) -> bool {
        self.indices.is_empty()
    }
}

/// The `q`-th quantile of `values`, interpolating linearly between order
/// statistics. Returns `None` for an empty slice.
///
/// ```rust
/// use seams::percentile;
///
/// let values = [4.0, 1.0, 3.0, 2.0];
/// assert_eq!(percentile(&values, 0.0), Some(1.0));
/// assert_eq!(percentile(&values, 0.5), Some(2.5));
/// assert_eq!(percentile(&values, 1.0), Some(4.0));
/// ```
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

fn sign(v: f64) -> i8 {
    if v > ZERO_TOLERANCE {
        1
    } else if v < -ZERO_TOLERANCE {
        -1
    } else {
        0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Find every zero crossing of the smoothed first derivative.
///
/// A crossing is reported between consecutive indices whose derivative
/// signs differ, unless the left one is already zero (that point was
/// reported by the crossing into it). The fractional position is found by
/// linear interpolation, and the second derivative and curve value are
/// interpolated at that position.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] for an unusable filter window or
/// order.
pub fn find_candidates(
    curve: &[f64],
    poly_order: usize,
    savgol_window: usize,
) -> Result<Vec<BoundaryCandidate>> {
    if curve.len() < 2 {
        return Ok(Vec::new());
    }

    let filter = SavitzkyGolay::fit(curve.len(), savgol_window, poly_order)?;
    let dy = filter.apply(curve, 1)?;
    let ddy = filter.apply(curve, 2)?;

    let candidates = (0..curve.len() - 1)
        .filter_map(|i| {
            let (a, b) = (dy[i], dy[i + 1]);
            let (sa, sb) = (sign(a), sign(b));
            if sa == sb || sa == 0 {
                return None;
            }
            let t = if sb == 0 { 1.0 } else { a / (a - b) };
            Some(BoundaryCandidate {
                position: i as f64 + t,
                value: lerp(curve[i], curve[i + 1], t),
                is_minimum: lerp(ddy[i], ddy[i + 1], t) > 0.0,
            })
        })
        .collect();

    Ok(candidates)
}

/// Locate significant minima of `curve` and convert them to unit indices.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if `q` is outside `[0, 1]` or the
/// filter parameters are unusable.
///
/// ```rust
/// use seams::find_boundaries;
///
/// // One clear valley around curve index 5.
/// let curve: Vec<f64> = (0..12).map(|i| (f64::from(i) - 5.2).powi(2)).collect();
/// let set = find_boundaries(&curve, 2, 5, 0.4).unwrap();
/// assert_eq!(set.indices, [6]);
/// ```
pub fn find_boundaries(
    curve: &[f64],
    poly_order: usize,
    savgol_window: usize,
    q: f64,
) -> Result<BoundarySet> {
    if !(0.0..=1.0).contains(&q) {
        return Err(Error::invalid(format!(
            "percentile ({q}) must be within [0, 1]"
        )));
    }

    let candidates = find_candidates(curve, poly_order, savgol_window)?;
    let threshold = percentile(curve, q);

    let mut indices: Vec<usize> = match threshold {
        Some(threshold) => candidates
            .iter()
            .filter(|c| c.is_minimum && c.value < threshold)
            .map(|c| c.unit_index(curve.len()))
            .collect(),
        None => Vec::new(),
    };
    indices.sort_unstable();
    indices.dedup();

    tracing::debug!(
        curve = curve.len(),
        candidates = candidates.len(),
        minima = candidates.iter().filter(|c| c.is_minimum).count(),
        boundaries = indices.len(),
        ?threshold,
        "boundary detection"
    );

    Ok(BoundarySet {
        candidates,
        threshold,
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valley() -> Vec<f64> {
        (0..12).map(|i| (f64::from(i) - 5.2).powi(2)).collect()
    }

    #[test]
    fn test_percentile_interpolates() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[7.0], 0.3), Some(7.0));
        let p = percentile(&[0.0, 10.0], 0.25).unwrap();
        assert!((p - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_valley_position() {
        let candidates = find_candidates(&valley(), 2, 5).unwrap();
        assert_eq!(candidates.len(), 1);
        let c = candidates[0];
        assert!(c.is_minimum);
        assert!((c.position - 5.2).abs() < 1e-9);
        // Interpolated between y[5] = 0.04 and y[6] = 0.64.
        assert!((c.value - 0.16).abs() < 1e-9);
        assert_eq!(c.curve_index(12), 5);
        assert_eq!(c.unit_index(12), 6);
    }

    #[test]
    fn test_peak_is_not_a_boundary() {
        let curve: Vec<f64> = valley().iter().map(|v| -v).collect();
        let set = find_boundaries(&curve, 2, 5, 1.0).unwrap();
        assert_eq!(set.candidates.len(), 1);
        assert!(!set.candidates[0].is_minimum);
        assert!(set.is_degenerate());
    }

    #[test]
    fn test_zero_percentile_excludes_everything() {
        let set = find_boundaries(&valley(), 2, 5, 0.0).unwrap();
        assert_eq!(set.candidates.len(), 1);
        assert!(set.is_degenerate());
    }

    #[test]
    fn test_periodic_curve_two_valleys() {
        let curve: Vec<f64> = (0..20)
            .map(|i| (2.0 * std::f64::consts::PI * f64::from(i) / 10.0).cos())
            .collect();
        let set = find_boundaries(&curve, 3, 5, 0.4).unwrap();
        assert_eq!(set.indices, [6, 16]);
    }

    #[test]
    fn test_flat_curve_has_no_boundaries() {
        let set = find_boundaries(&[0.8; 10], 2, 5, 0.5).unwrap();
        assert!(set.candidates.is_empty());
        assert!(set.is_degenerate());
    }

    #[test]
    fn test_short_curves() {
        assert!(find_boundaries(&[], 3, 5, 0.4).unwrap().is_degenerate());
        assert!(find_boundaries(&[0.5], 3, 5, 0.4).unwrap().is_degenerate());
        // Narrowed to a three-point window.
        let set = find_boundaries(&[0.9, 0.1, 0.9], 3, 7, 1.0).unwrap();
        assert!(set.indices.iter().all(|&i| (1..=3).contains(&i)));
    }

    #[test]
    fn test_invalid_percentile() {
        assert!(find_boundaries(&valley(), 2, 5, -0.1).is_err());
    }

    #[test]
    fn test_indices_strictly_increasing() {
        let curve: Vec<f64> = (0..60)
            .map(|i| (f64::from(i) * 0.7).sin() + (f64::from(i) * 0.13).cos())
            .collect();
        let set = find_boundaries(&curve, 3, 7, 0.5).unwrap();
        assert!(set.indices.windows(2).all(|w| w[0] < w[1]));
        assert!(set.indices.iter().all(|&i| (1..curve.len() + 1).contains(&i)));
    }
}
