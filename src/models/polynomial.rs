//! Polynomial model `y = c_0 + c_1 x + ... + c_d x^d`.

use crate::error::ModelFault;
use crate::models::model::{Model, SeparableModel, check_param_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polynomial {
    pub degree: usize,
}

impl Polynomial {
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    /// Straight line `c_0 + c_1 x`.
    pub fn line() -> Self {
        Self { degree: 1 }
    }
}

impl Model for Polynomial {
    fn param_count(&self) -> usize {
        self.degree + 1
    }

    fn evaluate(&self, x: f64, params: &[f64]) -> Result<f64, ModelFault> {
        check_param_len(params, self.param_count())?;
        // Horner.
        Ok(params.iter().rev().fold(0.0, |acc, &c| acc * x + c))
    }
}

impl SeparableModel for Polynomial {
    fn linear_len(&self) -> usize {
        self.degree + 1
    }

    fn nonlinear_len(&self) -> usize {
        0
    }

    fn fill_design_row(&self, x: f64, _nonlinear: &[f64], out: &mut [f64]) -> Result<(), ModelFault> {
        let mut pow = 1.0;
        for slot in out.iter_mut().take(self.degree + 1) {
            *slot = pow;
            pow *= x;
        }
        Ok(())
    }
}
