//! Log-log OLS estimator.
//!
//! `ln y = b0 + b1 ln x` over the range; `dimension = sign · b1`. R² uses
//! the log-space sums of squares, the p-value tests `b1 = 0` with a
//! Student t on `n − 2` degrees of freedom, and the analytic interval is
//! `b1 ± t · se(b1)` mapped through the sign.
use log::debug;

use super::{
    errors::EstResult,
    estimator::Estimator,
    kind::EstimatorKind,
    ols::OlsFit,
    result::{EstimationResult, signed_interval},
    validation::{range_points, require_positive},
};
use crate::{
    curve::{Curve, Range, Sign},
    inference::{DEFAULT_CONFIDENCE, confidence_interval, two_sided_p_value},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEstimator {
    level: f64,
}

impl LogEstimator {
    pub fn new(level: f64) -> Self {
        Self { level }
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

impl Default for LogEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE)
    }
}

fn log_fit(points: &[(f64, f64)]) -> EstResult<OlsFit> {
    let (lx, ly): (Vec<f64>, Vec<f64>) = points.iter().map(|&(x, y)| (x.ln(), y.ln())).unzip();
    OlsFit::fit(&lx, &ly)
}

impl Estimator for LogEstimator {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Log
    }

    fn parameter_count(&self) -> usize {
        2
    }

    fn preflight(&self, _sign: Sign, points: &[(f64, f64)], first_index: usize) -> EstResult<()> {
        require_positive(points, first_index)
    }

    fn estimate(&self, curve: &Curve, range: &Range) -> EstResult<EstimationResult> {
        let sign = curve.sign();
        let (start, _) = range.indices(curve)?;
        let points = range_points(curve, range)?;
        self.preflight(sign, &points, start)?;
        let fit = log_fit(&points)?;

        let se = fit.slope_standard_error();
        let dof = fit.dof();
        let p_value = two_sided_p_value(fit.slope / se, dof)?;
        let interval = confidence_interval(fit.slope, se, dof, self.level)?;
        let dimension = sign.value() * fit.slope;
        debug!(
            "log fit over [{}, {}]: {} point(s), dimension {dimension:.6}, r2 {:.6}",
            range.low(),
            range.high(),
            points.len(),
            fit.r_squared()
        );

        Ok(EstimationResult {
            dimension,
            sign,
            r2: fit.r_squared(),
            coefficients: vec![fit.intercept, fit.slope],
            confidence_interval: signed_interval(sign, interval),
            estimator: EstimatorKind::Log,
            model: None,
            n_points: points.len(),
            p_value: Some(p_value),
            bic: None,
            range: *range,
        })
    }

    fn resample_dimension(&self, points: &[(f64, f64)], sign: Sign) -> EstResult<f64> {
        Ok(sign.value() * log_fit(points)?.slope)
    }
}
