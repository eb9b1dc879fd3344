//! Lorentzian (Cauchy) loss.
//!
//! For a residual `r` and scale `s`, with `u = r / s`:
//!
//! - loss   `ρ(u) = ln(1 + u²)`
//! - weight `w(u) = 1 / (1 + u²)`
//!
//! `w` is the IRLS weight for `ρ`: `ρ'(u) / (2u) = w(u)`, so a weighted least
//! squares step with these weights does not increase `Σ ρ` at fixed `s`.

/// `ln(1 + (r / scale)²)`. `scale` must be positive.
#[inline]
pub fn lorentzian(residual: f64, scale: f64) -> f64 {
    let u = residual / scale;
    (u * u).ln_1p()
}

/// IRLS weight `1 / (1 + (r / scale)²)`, in `(0, 1]`. `scale` must be positive.
#[inline]
pub fn cauchy_weight(residual: f64, scale: f64) -> f64 {
    let u = residual / scale;
    1.0 / (1.0 + u * u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_is_zero_only_at_zero_residual() {
        assert_eq!(lorentzian(0.0, 1.0), 0.0);
        assert!(lorentzian(1e-8, 1.0) > 0.0);
        assert!((lorentzian(1.0, 1.0) - 2f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn loss_is_symmetric() {
        assert_eq!(lorentzian(-2.5, 0.7), lorentzian(2.5, 0.7));
    }

    #[test]
    fn weight_halves_at_one_scale() {
        assert_eq!(cauchy_weight(0.0, 3.0), 1.0);
        assert!((cauchy_weight(3.0, 3.0) - 0.5).abs() < 1e-15);
        assert!(cauchy_weight(1e6, 1.0) < 1e-11);
    }
}
