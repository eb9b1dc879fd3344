//! Seeded synthetic samples: a known curve plus Gaussian noise and jump outliers.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::domain::DataPoint;
use crate::error::FitError;
use crate::models::Model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSpec {
    pub n: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Standard deviation of the Gaussian noise on `y`.
    pub noise_sd: f64,
    /// Probability that a point receives a jump.
    pub outlier_prob: f64,
    /// Jump size in units of `noise_sd`; the sign is drawn at random.
    pub outlier_k: f64,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            n: 50,
            x_min: 0.0,
            x_max: 10.0,
            noise_sd: 0.1,
            outlier_prob: 0.05,
            outlier_k: 10.0,
            seed: 42,
        }
    }
}

impl SampleSpec {
    pub fn validate(&self) -> Result<(), FitError> {
        if self.n == 0 {
            return Err(FitError::invalid_input("sample size must be > 0"));
        }
        if !(self.x_min.is_finite() && self.x_max.is_finite() && self.x_max >= self.x_min) {
            return Err(FitError::invalid_input(format!(
                "invalid x range [{}, {}]",
                self.x_min, self.x_max
            )));
        }
        if !(self.noise_sd.is_finite() && self.noise_sd >= 0.0) {
            return Err(FitError::invalid_input(format!(
                "noise_sd must be finite and >= 0, got {}",
                self.noise_sd
            )));
        }
        if !(0.0..=1.0).contains(&self.outlier_prob) {
            return Err(FitError::invalid_input(format!(
                "outlier_prob must be in [0, 1], got {}",
                self.outlier_prob
            )));
        }
        if !(self.outlier_k.is_finite() && self.outlier_k >= 0.0) {
            return Err(FitError::invalid_input(format!(
                "outlier_k must be finite and >= 0, got {}",
                self.outlier_k
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    pub points: Vec<DataPoint>,
    /// Indices of the points that received a jump, ascending.
    pub outliers: Vec<usize>,
}

/// Draw `spec.n` points from `model` at `params`.
pub fn generate_sample<M: Model + ?Sized>(
    model: &M,
    params: &[f64],
    spec: &SampleSpec,
) -> Result<SampleData, FitError> {
    spec.validate()?;
    if params.len() != model.param_count() {
        return Err(FitError::invalid_input(format!(
            "expected {} parameters, got {}",
            model.param_count(),
            params.len()
        )));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, spec.noise_sd)
        .map_err(|e| FitError::invalid_input(format!("noise distribution: {e}")))?;
    let jump = spec.outlier_k * spec.noise_sd;

    let mut points = Vec::with_capacity(spec.n);
    let mut outliers = Vec::new();

    for index in 0..spec.n {
        let x = rng.gen_range(spec.x_min..=spec.x_max);
        let truth = model
            .evaluate(x, params)
            .map_err(|fault| FitError::ModelEvaluation { index, fault })?;

        let mut y = truth + normal.sample(&mut rng);
        if rng.gen_bool(spec.outlier_prob) {
            y += if rng.gen_bool(0.5) { jump } else { -jump };
            outliers.push(index);
        }
        points.push(DataPoint::new(x, y));
    }

    tracing::debug!(
        n = spec.n,
        outliers = outliers.len(),
        seed = spec.seed,
        "generated synthetic sample"
    );

    Ok(SampleData { points, outliers })
}
