//! Robust statistics: the RSDR scale estimator, the Lorentzian loss and the
//! ROUT outlier test.

pub mod loss;
pub mod outliers;
pub mod rsdr;

pub use loss::*;
pub use outliers::*;
pub use rsdr::*;
