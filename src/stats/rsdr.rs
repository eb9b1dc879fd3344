//! Robust Standard Deviation of the Residuals (RSDR).
//!
//! Motulsky & Brown (2006), Eq. 1:
//!
//! ```text
//! RSDR = P68 * N / (N - K)
//! ```
//!
//! where `P68` is the 68th percentile of the absolute residuals, taken here
//! at the 0-based sorted rank `floor(N * 0.6872)`, `N` is the number of
//! residuals and `K` the number of fitted parameters.

use crate::error::FitError;

/// Fraction of `N` giving the 0-based rank of `P68` in the sorted absolute residuals.
pub const P68_RANK_FRACTION: f64 = 0.6872;

/// `P68` of the absolute residuals (no degrees-of-freedom correction).
pub fn percentile_68(residuals: &[f64]) -> Result<f64, FitError> {
    if residuals.is_empty() {
        return Err(FitError::EmptyResidualSet);
    }

    let mut abs: Vec<f64> = residuals.iter().map(|r| r.abs()).collect();
    abs.sort_by(f64::total_cmp);

    let idx = (abs.len() as f64 * P68_RANK_FRACTION).floor() as usize;
    abs.get(idx).copied().ok_or(FitError::EmptyResidualSet)
}

/// Robust standard deviation of `residuals` after fitting `params_fit` parameters.
///
/// Faults instead of clamping: an empty slice is `EmptyResidualSet`,
/// `params_fit >= residuals.len()` is `DegenerateDegreesOfFreedom`.
pub fn rsdr(residuals: &[f64], params_fit: usize) -> Result<f64, FitError> {
    let n = residuals.len();
    if n == 0 {
        return Err(FitError::EmptyResidualSet);
    }
    if params_fit >= n {
        return Err(FitError::DegenerateDegreesOfFreedom { n, k: params_fit });
    }

    let p68 = percentile_68(residuals)?;
    Ok(p68 * n as f64 / (n - params_fit) as f64)
}
