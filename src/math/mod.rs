//! Numerical building blocks: factor loadings and weighted least squares.

pub mod basis;
pub mod ols;

pub use basis::*;
pub use ols::*;
