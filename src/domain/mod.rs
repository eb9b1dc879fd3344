//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - observations (`DataPoint`)
//! - objective selection (`LossKind`)
//! - fit outputs (`FitReport`, `Outlier`, `RoutReport`)

pub mod types;

pub use types::*;
