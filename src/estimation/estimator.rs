//! The estimator seam shared by fits, bootstrap and sessions.
use std::fmt::Debug;

use super::{
    direct_estimation::DirectEstimator, errors::EstResult, kind::EstimatorKind,
    log_estimation::LogEstimator, models::PowerLawModel, result::EstimationResult,
};
use crate::{
    curve::{Curve, Range, Sign},
    optimization::least_squares::LmOptions,
};

/// Estimator — turns a curve and range into an [`EstimationResult`].
///
/// Implementations are immutable and shareable across the bootstrap worker
/// pool.
pub trait Estimator: Debug + Send + Sync {
    fn kind(&self) -> EstimatorKind;

    /// Free parameters of the fitted form; resamples need at least this
    /// many distinct scales (and never fewer than two).
    fn parameter_count(&self) -> usize;

    /// Reject configurations and data this estimator cannot fit, before any
    /// work is done. `first_index` is the curve index of `points[0]`.
    fn preflight(&self, sign: Sign, points: &[(f64, f64)], first_index: usize) -> EstResult<()>;

    /// Full fit over `range`.
    fn estimate(&self, curve: &Curve, range: &Range) -> EstResult<EstimationResult>;

    /// Dimension only, for a resampled point set sorted by scale.
    fn resample_dimension(&self, points: &[(f64, f64)], sign: Sign) -> EstResult<f64>;

    fn bootstrap_iterations(&self) -> usize {
        self.kind().default_bootstrap_iterations()
    }
}

/// Build the estimator for `kind`; `model` and `lm` only affect the direct
/// estimator.
pub fn make_estimator(
    kind: EstimatorKind, model: PowerLawModel, lm: LmOptions, level: f64,
) -> Box<dyn Estimator> {
    match kind {
        EstimatorKind::Log => Box::new(LogEstimator::new(level)),
        EstimatorKind::Direct => Box::new(DirectEstimator::new(model, lm, level)),
    }
}
