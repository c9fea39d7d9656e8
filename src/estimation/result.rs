//! Fitted-result value type.
use serde::Serialize;

use super::{kind::EstimatorKind, models::PowerLawModel};
use crate::{
    curve::{FittedCurve, Range, Sign},
    optimization::least_squares::Theta,
};

/// EstimationResult — outcome of one fit over one range.
///
/// - `dimension`: `sign · slope` (log) or `sign · D` (direct).
/// - `coefficients`: `[intercept, slope]` of the log-log line (log) or the
///   model parameters in `[D, a, c]` order (direct).
/// - `confidence_interval`: analytic interval for `dimension` at the
///   estimator's level; unbounded when the fit has no residual degrees of
///   freedom.
/// - `p_value`: slope significance, log estimator only.
/// - `bic`: `k ln n + n ln(SSE/n)`, direct estimator only; `-∞` on an exact
///   fit.
///
/// Results are replaced wholesale on every refit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    pub dimension: f64,
    pub sign: Sign,
    pub r2: f64,
    pub coefficients: Vec<f64>,
    pub confidence_interval: (f64, f64),
    pub estimator: EstimatorKind,
    pub model: Option<PowerLawModel>,
    pub n_points: usize,
    pub p_value: Option<f64>,
    pub bic: Option<f64>,
    pub range: Range,
}

impl EstimationResult {
    /// Fitted measure at `scale`.
    pub fn predict(&self, scale: f64) -> f64 {
        match self.model {
            Some(model) => model.value(&Theta::from(self.coefficients.clone()), scale),
            None => (self.coefficients[0] + self.coefficients[1] * scale.ln()).exp(),
        }
    }
}

impl FittedCurve for EstimationResult {
    fn fit_range(&self) -> &Range {
        &self.range
    }

    fn fitted_value(&self, scale: f64) -> f64 {
        self.predict(scale)
    }
}

/// Map an interval on a fitted slope/exponent to one on `sign · value`.
pub(crate) fn signed_interval(sign: Sign, (lo, hi): (f64, f64)) -> (f64, f64) {
    match sign {
        Sign::Positive => (lo, hi),
        Sign::Negative => (-hi, -lo),
    }
}
