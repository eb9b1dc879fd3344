//! Fitting configuration.
//!
//! Defaults are suitable for typical data sets; `from_env` lets a deployment
//! override them through `ROBUST_FIT_*` variables (a `.env` file is honoured).

use serde::{Deserialize, Serialize};

use crate::error::FitError;

pub const ENV_MAX_ITERS: &str = "ROBUST_FIT_MAX_ITERS";
pub const ENV_TOLERANCE: &str = "ROBUST_FIT_TOLERANCE";
pub const ENV_ROUT_Q: &str = "ROBUST_FIT_ROUT_Q";
pub const ENV_MIN_WEIGHT: &str = "ROBUST_FIT_MIN_WEIGHT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Maximum IRLS reweighting iterations per candidate.
    pub max_iters: usize,
    /// IRLS stops once the largest relative parameter change falls to this.
    pub tolerance: f64,
    /// ROUT false discovery rate (Motulsky & Brown recommend 1%).
    pub rout_q: f64,
    /// Floor for IRLS weights so no row drops out of the design entirely.
    pub min_weight: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iters: 50,
            tolerance: 1e-10,
            rout_q: 0.01,
            min_weight: 1e-12,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<(), FitError> {
        if self.max_iters == 0 {
            return Err(FitError::invalid_config("max_iters must be >= 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(FitError::invalid_config(format!(
                "tolerance must be finite and >= 0, got {}",
                self.tolerance
            )));
        }
        if !(self.rout_q.is_finite() && self.rout_q > 0.0 && self.rout_q < 1.0) {
            return Err(FitError::invalid_config(format!(
                "rout_q must be in (0, 1), got {}",
                self.rout_q
            )));
        }
        if !(self.min_weight.is_finite() && self.min_weight > 0.0 && self.min_weight <= 1.0) {
            return Err(FitError::invalid_config(format!(
                "min_weight must be in (0, 1], got {}",
                self.min_weight
            )));
        }
        Ok(())
    }

    /// Defaults overridden by process environment (after loading `.env`).
    pub fn from_env() -> Result<Self, FitError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `ROBUST_FIT_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(ENV_MAX_ITERS) {
            config.max_iters = parse_var(ENV_MAX_ITERS, &v)?;
        }
        if let Some(v) = lookup(ENV_TOLERANCE) {
            config.tolerance = parse_var(ENV_TOLERANCE, &v)?;
        }
        if let Some(v) = lookup(ENV_ROUT_Q) {
            config.rout_q = parse_var(ENV_ROUT_Q, &v)?;
        }
        if let Some(v) = lookup(ENV_MIN_WEIGHT) {
            config.min_weight = parse_var(ENV_MIN_WEIGHT, &v)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, FitError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| FitError::invalid_config(format!("{key}='{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        FitConfig::default().validate().unwrap();
        let c = FitConfig::from_lookup(|_| None).unwrap();
        assert_eq!(c, FitConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let c = FitConfig::from_lookup(lookup_from(&[
            (ENV_MAX_ITERS, "7"),
            (ENV_ROUT_Q, " 0.05 "),
        ]))
        .unwrap();
        assert_eq!(c.max_iters, 7);
        assert!((c.rout_q - 0.05).abs() < 1e-15);
        assert_eq!(c.tolerance, FitConfig::default().tolerance);
    }

    #[test]
    fn unparsable_value_is_invalid_config() {
        let err = FitConfig::from_lookup(lookup_from(&[(ENV_TOLERANCE, "tight")])).unwrap_err();
        match err {
            FitError::InvalidConfig(msg) => assert!(msg.contains(ENV_TOLERANCE), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn out_of_range_value_is_invalid_config() {
        let err = FitConfig::from_lookup(lookup_from(&[(ENV_ROUT_Q, "1.5")])).unwrap_err();
        assert!(matches!(err, FitError::InvalidConfig(_)));
        let err = FitConfig::from_lookup(lookup_from(&[(ENV_MAX_ITERS, "0")])).unwrap_err();
        assert!(matches!(err, FitError::InvalidConfig(_)));
    }
}
