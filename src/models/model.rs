//! The model capability.
//!
//! Fitting and merit code only needs two primitive operations:
//! - predict `y(x)` given a parameter vector (for residuals)
//! - for models linear in some parameters, build a design row for given
//!   nonlinear parameters (for weighted least squares)

use crate::error::ModelFault;

/// A parametric model `y = f(x; params)`.
///
/// Implementations must be deterministic. `Sync` is required because fitters
/// evaluate candidates in parallel.
pub trait Model: Sync {
    /// Number of entries `evaluate` expects in `params`.
    fn param_count(&self) -> usize;

    fn evaluate(&self, x: f64, params: &[f64]) -> Result<f64, ModelFault>;
}

/// A model that is linear in its first `linear_len()` parameters once the
/// remaining `nonlinear_len()` parameters are fixed:
///
/// ```text
/// y = Σ_j linear_j * g_j(x; nonlinear)
/// ```
///
/// Parameter layout is `[linear.., nonlinear..]`.
pub trait SeparableModel: Model {
    fn linear_len(&self) -> usize;

    fn nonlinear_len(&self) -> usize;

    /// Write `g_j(x; nonlinear)` for `j in 0..linear_len()` into `out`.
    fn fill_design_row(&self, x: f64, nonlinear: &[f64], out: &mut [f64]) -> Result<(), ModelFault>;

    /// Assemble a full parameter vector.
    fn join_params(&self, linear: &[f64], nonlinear: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(linear.len() + nonlinear.len());
        out.extend_from_slice(linear);
        out.extend_from_slice(nonlinear);
        out
    }
}

pub(crate) fn check_param_len(params: &[f64], expected: usize) -> Result<(), ModelFault> {
    if params.len() != expected {
        return Err(ModelFault::new(format!(
            "expected {expected} parameters, got {}",
            params.len()
        )));
    }
    Ok(())
}

/// Adapts a closure into a `Model`.
///
/// ```
/// use robust_fit::models::{FnModel, Model};
///
/// let line = FnModel::new(2, |x, p| Ok(p[0] + p[1] * x));
/// assert_eq!(line.evaluate(2.0, &[1.0, 3.0]).unwrap(), 7.0);
/// ```
pub struct FnModel<F> {
    param_count: usize,
    f: F,
}

impl<F> FnModel<F> {
    pub fn new(param_count: usize, f: F) -> Self
    where
        F: Fn(f64, &[f64]) -> Result<f64, ModelFault> + Sync,
    {
        Self { param_count, f }
    }
}

impl<F> Model for FnModel<F>
where
    F: Fn(f64, &[f64]) -> Result<f64, ModelFault> + Sync,
{
    fn param_count(&self) -> usize {
        self.param_count
    }

    fn evaluate(&self, x: f64, params: &[f64]) -> Result<f64, ModelFault> {
        check_param_len(params, self.param_count)?;
        (self.f)(x, params)
    }
}

impl<F> std::fmt::Debug for FnModel<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnModel")
            .field("param_count", &self.param_count)
            .finish_non_exhaustive()
    }
}
