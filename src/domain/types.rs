//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so callers
//! can log or persist fit outputs without wrapping them.

use serde::{Deserialize, Serialize};

/// A single observation: model input `x` and observed output `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Objective minimised by the IRLS fitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossKind {
    /// `Σ ln(1 + (r / RSDR)²)`, solved by Cauchy-weighted IRLS.
    #[default]
    Lorentzian,
    /// Ordinary least squares (`Σ r²`), a single unweighted solve.
    SquaredError,
}

/// Fitted parameters and the merit evaluated at them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub params: Vec<f64>,
    /// `observed - predicted`, in input order.
    pub residuals: Vec<f64>,
    pub rsdr: f64,
    pub merit: f64,
    /// Number of points.
    pub n: usize,
    /// Number of fitted parameters.
    pub k: usize,
}

impl FitReport {
    /// Sum of squared residuals at the fitted parameters.
    pub fn sse(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }
}

/// A point flagged by the ROUT false-discovery test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    /// Index into the input points.
    pub index: usize,
    pub residual: f64,
    /// `|residual| / RSDR`.
    pub t_ratio: f64,
    /// Two-tailed p-value of `t_ratio` under Student's t with `n - k` DOF.
    pub p_value: f64,
}

/// Output of a ROUT run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutReport {
    /// Robust fit on every point.
    pub robust: FitReport,
    pub outliers: Vec<Outlier>,
    /// Refit on the points that were not flagged.
    pub cleaned: FitReport,
}

impl RoutReport {
    pub fn outlier_indices(&self) -> Vec<usize> {
        self.outliers.iter().map(|o| o.index).collect()
    }
}
