//! ROUT outlier test.
//!
//! After a robust fit, each residual is turned into a t ratio `|r| / RSDR` and
//! a two-tailed p-value under Student's t with `N - K` degrees of freedom. The
//! p-values are then screened with the Benjamini–Hochberg step-up procedure so
//! that the expected fraction of false discoveries among flagged points is at
//! most `q`.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::domain::Outlier;
use crate::error::FitError;

pub fn check_false_discovery_rate(q: f64) -> Result<(), FitError> {
    if !(q.is_finite() && q > 0.0 && q < 1.0) {
        return Err(FitError::invalid_input(format!(
            "false discovery rate q must be in (0, 1), got {q}"
        )));
    }
    Ok(())
}

/// Outliers of a fit whose robust scale is zero.
///
/// Every nonzero residual has an infinite t ratio, so each one is flagged with
/// a p-value of `0`.
pub fn flag_nonzero_residuals(residuals: &[f64]) -> Vec<Outlier> {
    residuals
        .iter()
        .enumerate()
        .filter(|(_, r)| **r != 0.0)
        .map(|(index, &residual)| Outlier {
            index,
            residual,
            t_ratio: f64::INFINITY,
            p_value: 0.0,
        })
        .collect()
}

/// Flag outliers among `residuals` of a fit with `params_fit` parameters.
///
/// `rsdr` is the robust scale of the same residuals. Returns the flagged points
/// ordered by index (possibly none).
pub fn detect_outliers(
    residuals: &[f64],
    rsdr: f64,
    params_fit: usize,
    q: f64,
) -> Result<Vec<Outlier>, FitError> {
    check_false_discovery_rate(q)?;
    let n = residuals.len();
    if n == 0 {
        return Err(FitError::EmptyResidualSet);
    }
    if params_fit >= n {
        return Err(FitError::DegenerateDegreesOfFreedom { n, k: params_fit });
    }
    if !(rsdr.is_finite() && rsdr > 0.0) {
        return Err(FitError::DegenerateScale);
    }

    let dof = (n - params_fit) as f64;
    let dist = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| FitError::invalid_input(format!("Student's t with {dof} DOF: {e}")))?;

    let scored: Vec<Outlier> = residuals
        .iter()
        .enumerate()
        .map(|(index, &residual)| {
            let t_ratio = residual.abs() / rsdr;
            let p_value = (2.0 * dist.sf(t_ratio)).min(1.0);
            Outlier {
                index,
                residual,
                t_ratio,
                p_value,
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scored[a]
            .p_value
            .total_cmp(&scored[b].p_value)
            .then(a.cmp(&b))
    });

    // Step-up: the largest rank m with p_(m) <= q * m / n; ranks 1..=m are flagged.
    let n_f = n as f64;
    let cutoff = order
        .iter()
        .enumerate()
        .filter(|(rank, idx)| scored[**idx].p_value <= q * (*rank as f64 + 1.0) / n_f)
        .map(|(rank, _)| rank + 1)
        .last()
        .unwrap_or(0);

    let mut flagged: Vec<Outlier> = order[..cutoff].iter().map(|&i| scored[i].clone()).collect();
    flagged.sort_by_key(|o| o.index);

    tracing::debug!(n, params_fit, q, flagged = flagged.len(), "rout outlier screen");
    Ok(flagged)
}
