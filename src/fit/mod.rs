//! Fitting and the robust merit.
//!
//! - `merit`: residuals, RSDR and the Lorentzian merit for given parameters
//! - `fitter`: the `Fitter` capability with grid search and IRLS
//! - `grid`: parameter grids for nonlinear parameters
//! - `robust`: fit, then evaluate
//! - `rout`: robust fit, outlier test, clean refit

pub mod fitter;
pub mod grid;
pub mod merit;
pub mod robust;
pub mod rout;

pub use fitter::*;
pub use grid::*;
pub use merit::*;
pub use robust::*;
pub use rout::*;
