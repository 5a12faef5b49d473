//! Savitzky–Golay smoothing and differentiation.
//!
//! A Savitzky–Golay filter fits a polynomial of order `p` to every window of
//! `w` samples by least squares and reads off the fitted value (or one of its
//! derivatives) at the point of interest. Because the least-squares solution
//! is linear in the samples, the whole fit collapses into a fixed
//! convolution kernel:
//!
//! ```text
//! A[j][k] = x_j^k                  x_j = (j - w/2) / scale
//! P       = (AᵀA)⁻¹ Aᵀ             (p+1) × w pseudo-inverse
//! c       = P · y                  polynomial coefficients
//! ```
//!
//! The weight of sample `j` in the `d`-th derivative evaluated at offset `t`
//! is `scale⁻ᵈ · Σₖ k!/(k-d)! · (t/scale)^(k-d) · P[k][j]`. Kernels are
//! computed once per offset, so interior points use the centered kernel and
//! the first and last `w/2` points use the edge window's polynomial evaluated
//! at their own offset. No padding, no phase shift.
//!
//! Abscissae are scaled into `[-1, 1]` before forming `AᵀA` to keep the
//! normal matrix well conditioned for larger windows.

use crate::{Error, Result};

/// Highest derivative with a precomputed kernel.
pub const MAX_DERIVATIVE: usize = 2;

/// Precomputed Savitzky–Golay kernels for one window length and order.
///
/// ```rust
/// use seams::SavitzkyGolay;
///
/// // y = x² sampled on 0..7; an order-2 fit reproduces it exactly.
/// let y: Vec<f64> = (0..7).map(|i| (i * i) as f64).collect();
/// let filter = SavitzkyGolay::new(5, 2).unwrap();
///
/// let slope = filter.apply(&y, 1).unwrap();
/// assert!((slope[3] - 6.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SavitzkyGolay {
    window: usize,
    order: usize,
    /// `kernels[d][pos][j]`: weight of sample `j` for derivative `d`
    /// evaluated at window position `pos`.
    kernels: Vec<Vec<Vec<f64>>>,
}

impl SavitzkyGolay {
    /// Build the kernels for an odd `window` and `order < window`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an even or zero window,
    /// or an order that is not below the window.
    pub fn new(window: usize, order: usize) -> Result<Self> {
        if window == 0 || window % 2 == 0 {
            return Err(Error::invalid(format!(
                "savgol window ({window}) must be odd and >= 1"
            )));
        }
        if order >= window {
            return Err(Error::invalid(format!(
                "poly_order ({order}) must be < savgol window ({window})"
            )));
        }

        let half = window / 2;
        let scale = half.max(1) as f64;
        let xs: Vec<f64> = (0..window)
            .map(|j| (j as f64 - half as f64) / scale)
            .collect();
        let pinv = pseudo_inverse(&xs, order)?;

        let kernels = (0..=MAX_DERIVATIVE)
            .map(|d| {
                let deriv_scale = scale.powi(d as i32);
                xs.iter()
                    .map(|&x| {
                        (0..window)
                            .map(|j| {
                                (d..=order)
                                    .map(|k| falling(k, d) * x.powi((k - d) as i32) * pinv[k][j])
                                    .sum::<f64>()
                                    / deriv_scale
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            window,
            order,
            kernels,
        })
    }

    /// Build a filter for a signal of `len` samples, narrowing if needed.
    ///
    /// The window shrinks to the largest odd length that fits in `len`, and
    /// the order drops below the window when it has to.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new) for the requested parameters.
    pub fn fit(len: usize, window: usize, order: usize) -> Result<Self> {
        if window > len && len > 0 {
            let narrowed = if len % 2 == 0 { len - 1 } else { len };
            let order = order.min(narrowed - 1);
            tracing::trace!(window, narrowed, order, "narrowing smoothing window");
            return Self::new(narrowed, order);
        }
        Self::new(window, order)
    }

    /// Window length.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Polynomial order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The centered convolution kernel for derivative `deriv`.
    ///
    /// # Panics
    ///
    /// Panics if `deriv > MAX_DERIVATIVE`.
    pub fn kernel(&self, deriv: usize) -> &[f64] {
        &self.kernels[deriv][self.window / 2]
    }

    /// Smooth (`deriv == 0`) or differentiate `y`.
    ///
    /// Signals shorter than the window are handled by a narrowed filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `deriv > MAX_DERIVATIVE`.
    pub fn apply(&self, y: &[f64], deriv: usize) -> Result<Vec<f64>> {
        if deriv > MAX_DERIVATIVE {
            return Err(Error::invalid(format!(
                "derivative {deriv} exceeds supported maximum {MAX_DERIVATIVE}"
            )));
        }
        let n = y.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        if n < self.window {
            return Self::fit(n, self.window, self.order)?.apply(y, deriv);
        }

        let half = self.window / 2;
        let out = (0..n)
            .map(|i| {
                let start = if i < half {
                    0
                } else if i + half >= n {
                    n - self.window
                } else {
                    i - half
                };
                self.kernels[deriv][i - start]
                    .iter()
                    .zip(&y[start..start + self.window])
                    .map(|(w, v)| w * v)
                    .sum()
            })
            .collect();
        Ok(out)
    }
}

/// `k! / (k - d)!`
fn falling(k: usize, d: usize) -> f64 {
    (k + 1 - d..=k).map(|v| v as f64).product()
}

/// `(AᵀA)⁻¹ Aᵀ` for the Vandermonde matrix of `xs` up to `order`.
fn pseudo_inverse(xs: &[f64], order: usize) -> Result<Vec<Vec<f64>>> {
    let cols = order + 1;
    let vandermonde: Vec<Vec<f64>> = xs
        .iter()
        .map(|&x| (0..cols).map(|k| x.powi(k as i32)).collect())
        .collect();

    let normal: Vec<Vec<f64>> = (0..cols)
        .map(|r| {
            (0..cols)
                .map(|c| vandermonde.iter().map(|row| row[r] * row[c]).sum())
                .collect()
        })
        .collect();
    let inverse = invert(normal)
        .ok_or_else(|| Error::invalid("smoothing filter normal matrix is singular"))?;

    Ok((0..cols)
        .map(|k| {
            (0..xs.len())
                .map(|j| (0..cols).map(|c| inverse[k][c] * vandermonde[j][c]).sum())
                .collect()
        })
        .collect())
}

/// Gauss–Jordan inversion with partial pivoting.
fn invert(mut a: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|r| (0..n).map(|c| if r == c { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for k in 0..n {
            a[col][k] /= p;
            inv[col][k] /= p;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            for k in 0..n {
                let (pa, pi) = (a[col][k], inv[col][k]);
                a[row][k] -= factor * pa;
                inv[row][k] -= factor * pi;
            }
        }
    }
    Some(inv)
}
