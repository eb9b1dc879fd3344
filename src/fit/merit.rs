//! Robust merit function.
//!
//! For data points `(x_i, y_i)`, a model `f` and parameters `θ`:
//!
//! ```text
//! d_i   = y_i - f(x_i; θ)
//! s     = RSDR(d, len(θ))
//! merit = Σ ln(1 + (d_i / s)²)
//! ```
//!
//! The merit is evaluated at the parameters it is given and never fits
//! internally. Fitting is a separate capability (`Fitter`); `robust_fit`
//! composes the two. `MeritObjective` packages the merit as a plain objective
//! `θ -> merit` for use inside an external optimizer.

use serde::{Deserialize, Serialize};

use crate::domain::DataPoint;
use crate::error::{FitError, ModelFault};
use crate::models::Model;
use crate::stats::{lorentzian, rsdr};

/// Every intermediate of one merit evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeritBreakdown {
    pub residuals: Vec<f64>,
    pub rsdr: f64,
    /// Per-point `ln(1 + (d_i / s)²)`.
    pub contributions: Vec<f64>,
    pub merit: f64,
}

/// `y_i - model(x_i, params)` for every point.
///
/// A model fault, or a non-finite prediction, stops evaluation and is reported
/// with the index of the offending point.
pub fn residuals<M: Model + ?Sized>(
    model: &M,
    params: &[f64],
    points: &[DataPoint],
) -> Result<Vec<f64>, FitError> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(FitError::invalid_input(format!(
                    "non-finite data point at index {index}: ({}, {})",
                    p.x, p.y
                )));
            }
            let y_fit = model
                .evaluate(p.x, params)
                .map_err(|fault| FitError::ModelEvaluation { index, fault })?;
            if !y_fit.is_finite() {
                return Err(FitError::ModelEvaluation {
                    index,
                    fault: ModelFault::new(format!("non-finite prediction {y_fit} at x={}", p.x)),
                });
            }
            Ok(p.y - y_fit)
        })
        .collect()
}

/// `Σ ln(1 + (d / scale)²)` over precomputed residuals.
///
/// A zero scale is only meaningful for a perfect fit: all-zero residuals give
/// a merit of `0`, anything else is `DegenerateScale`.
pub fn lorentzian_merit(residuals: &[f64], scale: f64) -> Result<f64, FitError> {
    if scale > 0.0 {
        return Ok(residuals.iter().map(|&d| lorentzian(d, scale)).sum());
    }
    if scale == 0.0 && residuals.iter().all(|&d| d == 0.0) {
        return Ok(0.0);
    }
    Err(FitError::DegenerateScale)
}

/// `Σ d²`, the objective the merit is meant to replace.
pub fn sum_of_squares(residuals: &[f64]) -> f64 {
    residuals.iter().map(|d| d * d).sum()
}

/// Robust merit of `params` on `points` (lower is better).
pub fn robust_merit<M: Model + ?Sized>(
    model: &M,
    params: &[f64],
    points: &[DataPoint],
) -> Result<f64, FitError> {
    let d = residuals(model, params, points)?;
    let s = rsdr(&d, params.len())?;
    lorentzian_merit(&d, s)
}

/// Same as `robust_merit`, keeping the residuals, scale and contributions.
pub fn merit_breakdown<M: Model + ?Sized>(
    model: &M,
    params: &[f64],
    points: &[DataPoint],
) -> Result<MeritBreakdown, FitError> {
    let residuals = residuals(model, params, points)?;
    let s = rsdr(&residuals, params.len())?;
    let merit = lorentzian_merit(&residuals, s)?;
    let contributions = if s > 0.0 {
        residuals.iter().map(|&d| lorentzian(d, s)).collect()
    } else {
        vec![0.0; residuals.len()]
    };

    Ok(MeritBreakdown {
        residuals,
        rsdr: s,
        contributions,
        merit,
    })
}

/// The merit bound to a model and a data set: `θ -> merit(θ)`.
///
/// Meant to be handed to an optimizer as its per-iteration objective.
#[derive(Debug, Clone, Copy)]
pub struct MeritObjective<'a, M: ?Sized> {
    model: &'a M,
    points: &'a [DataPoint],
}

impl<'a, M: Model + ?Sized> MeritObjective<'a, M> {
    pub fn new(model: &'a M, points: &'a [DataPoint]) -> Self {
        Self { model, points }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    pub fn points(&self) -> &'a [DataPoint] {
        self.points
    }

    pub fn value(&self, params: &[f64]) -> Result<f64, FitError> {
        robust_merit(self.model, params, self.points)
    }

    pub fn breakdown(&self, params: &[f64]) -> Result<MeritBreakdown, FitError> {
        merit_breakdown(self.model, params, self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FnModel, Polynomial};

    fn line_points(n: usize) -> Vec<DataPoint> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                // Small deterministic wiggle so residuals are not all zero.
                let wiggle = if i % 2 == 0 { 0.1 } else { -0.1 };
                DataPoint::new(x, 1.0 + 2.0 * x + wiggle)
            })
            .collect()
    }

    #[test]
    fn merit_is_non_negative() {
        let pts = line_points(12);
        let m = Polynomial::line();
        for params in [[1.0, 2.0], [0.0, 0.0], [-5.0, 3.5]] {
            let v = robust_merit(&m, &params, &pts).unwrap();
            assert!(v >= 0.0, "{params:?} -> {v}");
        }
    }

    #[test]
    fn merit_is_zero_for_exact_fit() {
        let pts: Vec<DataPoint> = (0..6).map(|i| DataPoint::new(i as f64, 3.0 - i as f64)).collect();
        let b = merit_breakdown(&Polynomial::line(), &[3.0, -1.0], &pts).unwrap();
        assert_eq!(b.merit, 0.0);
        assert_eq!(b.rsdr, 0.0);
        assert!(b.contributions.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn merit_is_positive_when_any_residual_is_non_zero() {
        let pts = line_points(12);
        let v = robust_merit(&Polynomial::line(), &[1.0, 2.0], &pts).unwrap();
        assert!(v > 0.0);
    }

    #[test]
    fn breakdown_contributions_sum_to_merit() {
        let pts = line_points(10);
        let b = merit_breakdown(&Polynomial::line(), &[0.8, 2.05], &pts).unwrap();
        let total: f64 = b.contributions.iter().sum();
        assert!((total - b.merit).abs() < 1e-12);
        assert_eq!(b.residuals.len(), 10);
        assert!(b.rsdr > 0.0);
    }

    #[test]
    fn merit_grows_logarithmically_in_an_outlier() {
        // Residuals at the true line are ±0.1; a single point gets an outlier.
        let m = Polynomial::line();
        let params = [1.0, 2.0];
        let with_outlier = |size: f64| {
            let mut pts = line_points(20);
            pts[7].y += size;
            let d = residuals(&m, &params, &pts).unwrap();
            (robust_merit(&m, &params, &pts).unwrap(), sum_of_squares(&d))
        };

        let (merit_small, sse_small) = with_outlier(10.0);
        let (merit_big, sse_big) = with_outlier(100.0);

        // 10x the outlier: squared error grows ~100x, merit by about 2 ln(10).
        assert!(sse_big / sse_small > 90.0);
        let merit_growth = merit_big - merit_small;
        assert!(merit_growth > 0.0);
        assert!(merit_growth < 2.0 * 10f64.ln() + 0.1, "growth {merit_growth}");
        assert!(merit_big / merit_small < 2.0);
    }

    #[test]
    fn model_fault_propagates_with_index() {
        let m = FnModel::new(1, |x, p| {
            if x > 2.5 {
                Err(ModelFault::new("x out of domain"))
            } else {
                Ok(p[0] * x)
            }
        });
        let pts: Vec<DataPoint> = (0..5).map(|i| DataPoint::new(i as f64, i as f64)).collect();
        match robust_merit(&m, &[1.0], &pts) {
            Err(FitError::ModelEvaluation { index, fault }) => {
                assert_eq!(index, 3);
                assert_eq!(fault.message(), "x out of domain");
            }
            other => panic!("expected model fault, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_prediction_is_a_model_fault() {
        let m = FnModel::new(1, |x, p| Ok(p[0] / x));
        let pts = [DataPoint::new(0.0, 1.0), DataPoint::new(1.0, 1.0)];
        assert!(matches!(
            robust_merit(&m, &[1.0], &pts),
            Err(FitError::ModelEvaluation { index: 0, .. })
        ));
    }

    #[test]
    fn scale_faults_propagate() {
        let m = Polynomial::line();
        assert_eq!(robust_merit(&m, &[1.0, 2.0], &[]), Err(FitError::EmptyResidualSet));
        let pts = line_points(2);
        assert_eq!(
            robust_merit(&m, &[1.0, 2.0], &pts),
            Err(FitError::DegenerateDegreesOfFreedom { n: 2, k: 2 })
        );
    }

    #[test]
    fn zero_scale_with_non_zero_residual_is_degenerate() {
        assert_eq!(lorentzian_merit(&[0.0, 0.0, 0.0, 1.0], 0.0), Err(FitError::DegenerateScale));
        assert_eq!(lorentzian_merit(&[0.0, 0.0], 0.0), Ok(0.0));
    }

    #[test]
    fn objective_matches_free_function() {
        let pts = line_points(9);
        let m = Polynomial::line();
        let obj = MeritObjective::new(&m, &pts);
        let params = [1.2, 1.9];
        assert_eq!(obj.value(&params).unwrap(), robust_merit(&m, &params, &pts).unwrap());
        assert_eq!(obj.breakdown(&params).unwrap().merit, obj.value(&params).unwrap());
    }
}
