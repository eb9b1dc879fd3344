//! Parameter grids for the nonlinear part of separable models.

use crate::error::FitError;
use crate::models::NsKind;

/// `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, FitError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
        return Err(FitError::invalid_input(format!(
            "log grid range: min={min}, max={max} (must be finite, > 0 and max > min)"
        )));
    }
    let ln = lin_space(min.ln(), max.ln(), steps)?;
    Ok(ln.into_iter().map(f64::exp).collect())
}

/// `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, FitError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(FitError::invalid_input(format!(
            "grid range: min={min}, max={max} (must be finite and max > min)"
        )));
    }
    if steps < 2 {
        return Err(FitError::invalid_input("grid steps must be >= 2"));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
    // Pin the endpoint against accumulated rounding.
    out[steps - 1] = max;
    Ok(out)
}

/// Every combination of one value per axis, first axis varying slowest.
pub fn cartesian(axes: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut out: Vec<Vec<f64>> = vec![Vec::new()];
    for axis in axes {
        let mut next = Vec::with_capacity(out.len() * axis.len());
        for prefix in &out {
            for &v in axis {
                let mut row = prefix.clone();
                row.push(v);
                next.push(row);
            }
        }
        out = next;
    }
    out
}

/// All strictly increasing `dims`-tuples drawn from `values` (assumed sorted)
/// where each element is at least `min_ratio` times the previous one.
pub fn ordered_grid(values: &[f64], dims: usize, min_ratio: f64) -> Vec<Vec<f64>> {
    let min_ratio = min_ratio.max(1.0);
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(dims);
    push_ordered(values, 0, dims, min_ratio, &mut current, &mut out);
    out
}

fn push_ordered(
    values: &[f64],
    start: usize,
    dims: usize,
    min_ratio: f64,
    current: &mut Vec<f64>,
    out: &mut Vec<Vec<f64>>,
) {
    if current.len() == dims {
        out.push(current.clone());
        return;
    }
    for i in start..values.len() {
        if let Some(&last) = current.last() {
            if values[i] < last * min_ratio {
                continue;
            }
        }
        current.push(values[i]);
        push_ordered(values, i + 1, dims, min_ratio, current, out);
        current.pop();
    }
}

/// Tau grid for a Nelson–Siegel model: log-spaced values, ordered tuples.
pub fn ns_tau_grid(
    kind: NsKind,
    min: f64,
    max: f64,
    steps: usize,
    min_ratio: f64,
) -> Result<Vec<Vec<f64>>, FitError> {
    let values = log_space(min, max, steps)?;
    Ok(ordered_grid(&values, kind.tau_len(), min_ratio))
}
