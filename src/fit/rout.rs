//! ROUT: robust regression followed by outlier removal.
//!
//! 1. fit every point with a robust fitter
//! 2. flag outliers with the false discovery rate test on `|r| / RSDR`
//! 3. refit the remaining points with a (typically least squares) fitter
//!
//! A robust fit that passes exactly through most points has RSDR `0`. Every
//! nonzero residual is then an outlier with an infinite t ratio, and the robust
//! report carries an infinite merit.

use crate::config::FitConfig;
use crate::domain::{DataPoint, FitReport, RoutReport};
use crate::error::FitError;
use crate::fit::fitter::Fitter;
use crate::fit::merit::{lorentzian_merit, residuals};
use crate::fit::robust::robust_fit;
use crate::models::Model;
use crate::stats::{check_false_discovery_rate, detect_outliers, flag_nonzero_residuals, rsdr};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rout {
    /// False discovery rate, in `(0, 1)`.
    pub q: f64,
}

impl Default for Rout {
    fn default() -> Self {
        Self::from_config(&FitConfig::default())
    }
}

impl Rout {
    pub fn new(q: f64) -> Self {
        Self { q }
    }

    pub fn from_config(config: &FitConfig) -> Self {
        Self { q: config.rout_q }
    }

    /// Run ROUT. The `cleaned` report covers only the points not flagged.
    pub fn run<M, R, C>(
        &self,
        model: &M,
        points: &[DataPoint],
        robust_fitter: &R,
        clean_fitter: &C,
    ) -> Result<RoutReport, FitError>
    where
        M: Model + ?Sized,
        R: Fitter<M> + ?Sized,
        C: Fitter<M> + ?Sized,
    {
        check_false_discovery_rate(self.q)?;

        let params = robust_fitter.fit(model, points)?;
        let k = params.len();
        let d = residuals(model, &params, points)?;
        let s = rsdr(&d, k)?;

        let (merit, outliers) = if s > 0.0 {
            (lorentzian_merit(&d, s)?, detect_outliers(&d, s, k, self.q)?)
        } else {
            let outliers = flag_nonzero_residuals(&d);
            let merit = if outliers.is_empty() { 0.0 } else { f64::INFINITY };
            (merit, outliers)
        };

        let robust = FitReport {
            params,
            residuals: d,
            rsdr: s,
            merit,
            n: points.len(),
            k,
        };

        let mut flagged = vec![false; points.len()];
        for o in &outliers {
            flagged[o.index] = true;
        }
        let inliers: Vec<DataPoint> = points
            .iter()
            .zip(flagged.iter())
            .filter(|(_, f)| !**f)
            .map(|(p, _)| *p)
            .collect();

        tracing::debug!(
            n = points.len(),
            outliers = outliers.len(),
            q = self.q,
            "rout refitting inliers"
        );

        let cleaned = robust_fit(model, &inliers, clean_fitter)?;

        Ok(RoutReport {
            robust,
            outliers,
            cleaned,
        })
    }
}
