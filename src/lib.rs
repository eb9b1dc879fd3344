//! `robust-fit` library crate.
//!
//! Robust curve fitting: the RSDR scale estimate, a Lorentzian merit built on
//! it, fitters that minimise it, and ROUT outlier removal.
//!
//! ```
//! use robust_fit::domain::{DataPoint, LossKind};
//! use robust_fit::fit::{robust_fit, IrlsFitter};
//! use robust_fit::models::Polynomial;
//!
//! let points: Vec<DataPoint> = (0..20)
//!     .map(|i| {
//!         let noise = if i % 2 == 0 { 0.01 } else { -0.01 };
//!         DataPoint::new(i as f64, 1.0 + 0.5 * i as f64 + noise)
//!     })
//!     .collect();
//! let report = robust_fit(&Polynomial::line(), &points, &IrlsFitter::new(LossKind::Lorentzian))?;
//! assert!((report.params[1] - 0.5).abs() < 0.01);
//! # Ok::<(), robust_fit::error::FitError>(())
//! ```

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod stats;
