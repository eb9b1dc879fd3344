//! Nelson–Siegel factor loadings.
//!
//! With `x = t / τ`:
//!
//! - slope loading     `L1(x) = (1 - e^{-x}) / x`
//! - curvature loading `L2(x) = L1(x) - e^{-x}`
//!
//! Both have removable singularities at `x = 0` (`L1 → 1`, `L2 → 0`), so small
//! `x` is handled with a truncated Taylor series and the rest with `expm1`.

/// Below this `|x|` the series form is used.
const SERIES_CUTOFF: f64 = 1e-6;

/// Slope loading `L1(t, τ)`.
pub fn slope_loading(t: f64, tau: f64) -> f64 {
    let x = t / tau;
    if x.abs() < SERIES_CUTOFF {
        return 1.0 - x / 2.0 + x * x / 6.0;
    }
    -(-x).exp_m1() / x
}

/// Curvature loading `L2(t, τ)`.
pub fn curvature_loading(t: f64, tau: f64) -> f64 {
    let x = t / tau;
    if x.abs() < SERIES_CUTOFF {
        return x / 2.0 - x * x / 3.0;
    }
    slope_loading(t, tau) - (-x).exp()
}
