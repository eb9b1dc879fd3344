//! Model implementations.
//!
//! Fitting and merit code is generic over `Model`; the concrete models here
//! are small, pure and separable so the IRLS fitter can use them directly.

pub mod model;
pub mod nelson_siegel;
pub mod polynomial;

pub use model::{FnModel, Model, SeparableModel};
pub use nelson_siegel::*;
pub use polynomial::*;
