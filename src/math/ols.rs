//! Weighted linear least squares.
//!
//! The IRLS fitter repeatedly solves
//!
//! ```text
//! minimize Σ w_i (y_i - x_i^T β)^2
//! ```
//!
//! with changing weights. Rows are scaled by `sqrt(w_i)` and the resulting
//! ordinary least squares problem is solved by SVD, which handles tall and
//! rank-deficient design matrices (nalgebra's `QR::solve` only accepts square
//! systems).

use nalgebra::{DMatrix, DVector};

/// Solve `min ||x β - y||²` by SVD.
///
/// Returns `None` if no tolerance yields a finite solution.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Nearly collinear design columns (e.g. close taus) need a looser cutoff.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve `min Σ w_i (y_i - x_i^T β)^2`.
///
/// `design` is `n × p`; `y` and `weights` have length `n`. Weights must be
/// non-negative; a zero weight removes the row from the fit.
pub fn solve_weighted_least_squares(
    design: &DMatrix<f64>,
    y: &[f64],
    weights: &[f64],
) -> Option<DVector<f64>> {
    let n = design.nrows();
    if y.len() != n || weights.len() != n {
        return None;
    }

    let mut xw = design.clone();
    let mut yw = DVector::<f64>::zeros(n);
    for i in 0..n {
        let sw = weights[i].max(0.0).sqrt();
        xw.row_mut(i).scale_mut(sw);
        yw[i] = y[i] * sw;
    }

    solve_least_squares(&xw, &yw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // y = 2 + 3x on x = [0, 1, 2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn zero_weight_removes_a_row() {
        // Last row is far off the line y = 1 + x; with zero weight it is ignored.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = [1.0, 2.0, 3.0, 100.0];
        let w = [1.0, 1.0, 1.0, 0.0];

        let beta = solve_weighted_least_squares(&x, &y, &w).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-9);
        assert!((beta[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        assert!(solve_weighted_least_squares(&x, &[1.0], &[1.0, 1.0]).is_none());
    }
}
