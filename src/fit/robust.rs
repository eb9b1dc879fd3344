//! Fit, then evaluate.
//!
//! The merit never fits on its own; this is the one place the two steps are
//! composed.

use crate::domain::{DataPoint, FitReport};
use crate::error::FitError;
use crate::fit::fitter::Fitter;
use crate::fit::merit::merit_breakdown;
use crate::models::Model;

/// Fit `model` to `points` with `fitter` and report the merit at the result.
pub fn robust_fit<M, F>(model: &M, points: &[DataPoint], fitter: &F) -> Result<FitReport, FitError>
where
    M: Model + ?Sized,
    F: Fitter<M> + ?Sized,
{
    let params = fitter.fit(model, points)?;
    evaluate_fit(model, params, points)
}

/// Report for caller-supplied parameters (no fitting).
pub fn evaluate_fit<M: Model + ?Sized>(
    model: &M,
    params: Vec<f64>,
    points: &[DataPoint],
) -> Result<FitReport, FitError> {
    let breakdown = merit_breakdown(model, &params, points)?;
    let k = params.len();

    tracing::debug!(
        n = points.len(),
        k,
        rsdr = breakdown.rsdr,
        merit = breakdown.merit,
        "evaluated fit"
    );

    Ok(FitReport {
        params,
        residuals: breakdown.residuals,
        rsdr: breakdown.rsdr,
        merit: breakdown.merit,
        n: points.len(),
        k,
    })
}
