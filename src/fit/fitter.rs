//! Fitting routines.
//!
//! `Fitter` is the "fit a model to data, return parameters" capability. Two
//! implementations:
//!
//! - `GridSearch`: any `Model`. Scores each candidate parameter vector
//!   (parallel) and keeps the best.
//! - `IrlsFitter`: any `SeparableModel`. For each candidate of the nonlinear
//!   parameters (parallel), solves the linear parameters by iteratively
//!   reweighted least squares, then keeps the best candidate.
//!
//! Candidates are ranked by the RSDR of their residuals, not by the merit
//! itself: the merit divides by a scale taken from the same residuals, so it
//! is invariant to their overall size and cannot tell a tight fit from a loose
//! one. Between candidates the robust scale can (least robust scale, as in
//! S-estimation). Within one IRLS run the scale is frozen per iteration, which
//! is where the Lorentzian merit does the work.
//!
//! Selection is deterministic: minimum score, ties broken by grid index.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::config::FitConfig;
use crate::domain::{DataPoint, LossKind};
use crate::error::FitError;
use crate::fit::merit::{residuals, sum_of_squares};
use crate::math::solve_weighted_least_squares;
use crate::models::{Model, SeparableModel};
use crate::stats::{cauchy_weight, rsdr};

/// Fit `model` to `points`, returning the full parameter vector.
pub trait Fitter<M: ?Sized> {
    fn fit(&self, model: &M, points: &[DataPoint]) -> Result<Vec<f64>, FitError>;
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    params: Vec<f64>,
    score: f64,
}

/// Deterministic selection: pick the minimum score; break ties by original grid index.
fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates
        .into_iter()
        .min_by(|a, b| a.score.total_cmp(&b.score).then(a.idx.cmp(&b.idx)))
}

fn check_dof(n: usize, k: usize) -> Result<(), FitError> {
    if n == 0 {
        return Err(FitError::EmptyResidualSet);
    }
    if k >= n {
        return Err(FitError::DegenerateDegreesOfFreedom { n, k });
    }
    Ok(())
}

/// `max_j |b_j - a_j| / (1 + |a_j|)`.
fn max_relative_change(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (y - x).abs() / (1.0 + x.abs()))
        .fold(0.0, f64::max)
}

fn no_candidate(total: usize, first_err: Option<FitError>) -> FitError {
    match first_err {
        Some(e) => FitError::NoValidCandidate(format!("all {total} candidates failed; first: {e}")),
        None => FitError::NoValidCandidate(format!("all {total} candidates failed")),
    }
}

/// Exhaustive search over explicit parameter vectors, scored by RSDR.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearch {
    pub candidates: Vec<Vec<f64>>,
}

impl GridSearch {
    pub fn new(candidates: Vec<Vec<f64>>) -> Self {
        Self { candidates }
    }
}

impl<M: Model + ?Sized> Fitter<M> for GridSearch {
    fn fit(&self, model: &M, points: &[DataPoint]) -> Result<Vec<f64>, FitError> {
        let k = model.param_count();
        check_dof(points.len(), k)?;
        if self.candidates.is_empty() {
            return Err(FitError::invalid_input("parameter grid is empty"));
        }
        if let Some(bad) = self.candidates.iter().position(|c| c.len() != k) {
            return Err(FitError::invalid_input(format!(
                "grid candidate {bad} has {} parameters, model expects {k}",
                self.candidates[bad].len()
            )));
        }

        let results: Vec<Result<Candidate, FitError>> = self
            .candidates
            .par_iter()
            .enumerate()
            .map(|(idx, params)| {
                let d = residuals(model, params, points)?;
                let score = rsdr(&d, k)?;
                Ok(Candidate {
                    idx,
                    params: params.clone(),
                    score,
                })
            })
            .collect();

        let total = results.len();
        let (ok, first_err) = split_results(results);
        let best = select_best(ok).ok_or_else(|| no_candidate(total, first_err))?;

        tracing::debug!(
            candidates = total,
            best_idx = best.idx,
            rsdr = best.score,
            "grid search selected candidate"
        );
        Ok(best.params)
    }
}

fn split_results(results: Vec<Result<Candidate, FitError>>) -> (Vec<Candidate>, Option<FitError>) {
    let mut ok = Vec::with_capacity(results.len());
    let mut first_err = None;
    for r in results {
        match r {
            Ok(c) => ok.push(c),
            Err(e) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    (ok, first_err)
}

/// Iteratively reweighted least squares for separable models.
///
/// With `LossKind::Lorentzian`, every iteration:
///
/// - solves the weighted linear problem for the current weights
/// - re-estimates the scale as the RSDR of the new residuals
/// - sets weights `1 / (1 + (r / RSDR)²)` (floored at `min_weight`)
///
/// until `max_iters` or the largest relative parameter change drops below
/// `tolerance`. The candidate is scored by the RSDR of its last iterate.
/// `LossKind::SquaredError` is a single unweighted solve scored by the sum of
/// squares.
#[derive(Debug, Clone, PartialEq)]
pub struct IrlsFitter {
    /// Candidate values of the nonlinear parameters. Ignored (treated as a
    /// single empty candidate) for models without nonlinear parameters.
    pub nonlinear_grid: Vec<Vec<f64>>,
    pub loss: LossKind,
    pub max_iters: usize,
    pub tolerance: f64,
    pub min_weight: f64,
}

impl IrlsFitter {
    pub fn new(loss: LossKind) -> Self {
        Self::from_config(&FitConfig::default(), loss)
    }

    pub fn from_config(config: &FitConfig, loss: LossKind) -> Self {
        Self {
            nonlinear_grid: Vec::new(),
            loss,
            max_iters: config.max_iters,
            tolerance: config.tolerance,
            min_weight: config.min_weight,
        }
    }

    pub fn with_nonlinear_grid(mut self, grid: Vec<Vec<f64>>) -> Self {
        self.nonlinear_grid = grid;
        self
    }

    fn fit_linear<M: SeparableModel + ?Sized>(
        &self,
        model: &M,
        points: &[DataPoint],
        nonlinear: &[f64],
        idx: usize,
    ) -> Result<Candidate, FitError> {
        let n = points.len();
        let p = model.linear_len();
        let k = model.param_count();

        let mut design = DMatrix::<f64>::zeros(n, p);
        let mut row = vec![0.0; p];
        for (i, pt) in points.iter().enumerate() {
            model
                .fill_design_row(pt.x, nonlinear, &mut row)
                .map_err(|fault| FitError::ModelEvaluation { index: i, fault })?;
            for (j, &g) in row.iter().enumerate() {
                design[(i, j)] = g;
            }
        }
        let y: Vec<f64> = points.iter().map(|pt| pt.y).collect();

        let iters = match self.loss {
            LossKind::SquaredError => 1,
            LossKind::Lorentzian => self.max_iters.max(1),
        };

        let mut weights = vec![1.0; n];
        let mut current: Option<(Vec<f64>, f64)> = None;

        for iter in 0..iters {
            let beta = solve_weighted_least_squares(&design, &y, &weights).ok_or_else(|| {
                FitError::NoValidCandidate(format!("least squares solve failed at candidate {idx}"))
            })?;
            let fitted = &design * &beta;
            let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(yi, fi)| yi - fi).collect();
            if residuals.iter().any(|r| !r.is_finite()) {
                return Err(FitError::NoValidCandidate(format!(
                    "non-finite residuals at candidate {idx}"
                )));
            }
            let linear: Vec<f64> = beta.iter().copied().collect();

            if self.loss == LossKind::SquaredError {
                current = Some((linear, sum_of_squares(&residuals)));
                break;
            }

            let s = rsdr(&residuals, k)?;
            tracing::trace!(candidate = idx, iter, rsdr = s, "irls iteration");

            let converged = current
                .as_ref()
                .is_some_and(|(prev, _)| max_relative_change(prev, &linear) <= self.tolerance);
            current = Some((linear, s));
            if converged || s <= 0.0 {
                break;
            }

            for (w, r) in weights.iter_mut().zip(residuals.iter()) {
                *w = cauchy_weight(*r, s).max(self.min_weight);
            }
        }

        let (linear, score) = current.ok_or_else(|| {
            FitError::NoValidCandidate(format!("no iterate produced at candidate {idx}"))
        })?;
        Ok(Candidate {
            idx,
            params: model.join_params(&linear, nonlinear),
            score,
        })
    }
}

impl<M: SeparableModel + ?Sized> Fitter<M> for IrlsFitter {
    fn fit(&self, model: &M, points: &[DataPoint]) -> Result<Vec<f64>, FitError> {
        let k = model.param_count();
        check_dof(points.len(), k)?;
        if model.linear_len() + model.nonlinear_len() != k {
            return Err(FitError::invalid_input(format!(
                "separable layout {} + {} does not match param_count {k}",
                model.linear_len(),
                model.nonlinear_len()
            )));
        }
        if let Some((i, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(FitError::invalid_input(format!(
                "non-finite data point at index {i}: ({}, {})",
                p.x, p.y
            )));
        }

        let empty = [Vec::new()];
        let grid: &[Vec<f64>] = if model.nonlinear_len() == 0 {
            &empty
        } else {
            &self.nonlinear_grid
        };
        if grid.is_empty() {
            return Err(FitError::invalid_input(
                "model has nonlinear parameters but the nonlinear grid is empty",
            ));
        }
        if let Some(bad) = grid.iter().position(|c| c.len() != model.nonlinear_len()) {
            return Err(FitError::invalid_input(format!(
                "nonlinear candidate {bad} has {} values, model expects {}",
                grid[bad].len(),
                model.nonlinear_len()
            )));
        }

        let results: Vec<Result<Candidate, FitError>> = grid
            .par_iter()
            .enumerate()
            .map(|(idx, nonlinear)| self.fit_linear(model, points, nonlinear, idx))
            .collect();

        let total = results.len();
        let (ok, first_err) = split_results(results);
        let best = select_best(ok).ok_or_else(|| no_candidate(total, first_err))?;

        tracing::debug!(
            candidates = total,
            best_idx = best.idx,
            score = best.score,
            loss = ?self.loss,
            "irls selected candidate"
        );
        Ok(best.params)
    }
}
