//! Nelson–Siegel family: NS, NSS (Svensson) and NSSC (a third hump).
//!
//! ```text
//! y(t) = β0 + β1 L1(t, τ1) + β2 L2(t, τ1) [+ β3 L2(t, τ2)] [+ β4 L2(t, τ3)]
//! ```
//!
//! Betas enter linearly, taus do not, so the family is a `SeparableModel` with
//! parameter layout `[β.., τ..]`.

use serde::{Deserialize, Serialize};

use crate::error::ModelFault;
use crate::math::{curvature_loading, slope_loading};
use crate::models::model::{Model, SeparableModel, check_param_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NsKind {
    Ns,
    Nss,
    Nssc,
}

impl NsKind {
    pub fn beta_len(self) -> usize {
        self.tau_len() + 2
    }

    pub fn tau_len(self) -> usize {
        match self {
            NsKind::Ns => 1,
            NsKind::Nss => 2,
            NsKind::Nssc => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NelsonSiegel {
    pub kind: NsKind,
}

impl NelsonSiegel {
    pub fn new(kind: NsKind) -> Self {
        Self { kind }
    }
}

fn check_taus(taus: &[f64]) -> Result<(), ModelFault> {
    if let Some(tau) = taus.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
        return Err(ModelFault::new(format!("tau must be finite and > 0, got {tau}")));
    }
    Ok(())
}

impl Model for NelsonSiegel {
    fn param_count(&self) -> usize {
        self.kind.beta_len() + self.kind.tau_len()
    }

    fn evaluate(&self, t: f64, params: &[f64]) -> Result<f64, ModelFault> {
        check_param_len(params, self.param_count())?;
        let (betas, taus) = params.split_at(self.kind.beta_len());

        let mut row = [0.0; 5];
        let row = &mut row[..betas.len()];
        self.fill_design_row(t, taus, row)?;
        Ok(betas.iter().zip(row.iter()).map(|(b, g)| b * g).sum())
    }
}

impl SeparableModel for NelsonSiegel {
    fn linear_len(&self) -> usize {
        self.kind.beta_len()
    }

    fn nonlinear_len(&self) -> usize {
        self.kind.tau_len()
    }

    fn fill_design_row(&self, t: f64, taus: &[f64], out: &mut [f64]) -> Result<(), ModelFault> {
        check_param_len(taus, self.kind.tau_len())?;
        check_taus(taus)?;
        if out.len() < self.kind.beta_len() {
            return Err(ModelFault::new("design row buffer too short"));
        }

        out[0] = 1.0;
        out[1] = slope_loading(t, taus[0]);
        out[2] = curvature_loading(t, taus[0]);
        for (slot, &tau) in out[3..self.kind.beta_len()].iter_mut().zip(&taus[1..]) {
            *slot = curvature_loading(t, tau);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_matches_explicit_formula() {
        let m = NelsonSiegel::new(NsKind::Nss);
        let params = [4.0, -1.0, 2.0, 0.5, 1.5, 6.0];
        let t = 3.0;
        let expected = 4.0 - slope_loading(t, 1.5) + 2.0 * curvature_loading(t, 1.5)
            + 0.5 * curvature_loading(t, 6.0);
        assert!((m.evaluate(t, &params).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn short_end_limit_is_beta0_plus_beta1() {
        let m = NelsonSiegel::new(NsKind::Ns);
        let y0 = m.evaluate(0.0, &[100.0, -20.0, 50.0, 2.0]).unwrap();
        assert!((y0 - 80.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_tau_is_a_fault() {
        let m = NelsonSiegel::new(NsKind::Ns);
        assert!(m.evaluate(1.0, &[1.0, 1.0, 1.0, 0.0]).is_err());
        assert!(m.evaluate(1.0, &[1.0, 1.0, 1.0, f64::NAN]).is_err());
    }

    #[test]
    fn param_layout_is_betas_then_taus() {
        let m = NelsonSiegel::new(NsKind::Nssc);
        assert_eq!(m.param_count(), 8);
        assert_eq!(m.linear_len(), 5);
        assert_eq!(m.nonlinear_len(), 3);
        assert_eq!(
            m.join_params(&[1.0, 2.0, 3.0, 4.0, 5.0], &[0.5, 2.0, 8.0]),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 0.5, 2.0, 8.0]
        );
    }
}
