//! Interactive fit state: one curve, one range, one estimator, one result.
use super::{
    bootstrap::{BootstrapOptions, bootstrap_interval},
    errors::EstResult,
    estimator::Estimator,
    result::EstimationResult,
};
use crate::{
    curve::{Curve, CurveResult, Range, report_string},
    execution::ExecContext,
};

/// FitSession — owns a curve and its current fit.
///
/// Every change of range or estimator refits and replaces the result
/// wholesale. A failed refit leaves the previous range, estimator and
/// result untouched. Mutation goes through `&mut self`, so a session has a
/// single writer.
#[derive(Debug)]
pub struct FitSession {
    curve: Curve,
    range: Range,
    estimator: Box<dyn Estimator>,
    result: EstimationResult,
}

impl FitSession {
    /// Fit `estimator` over the full curve.
    pub fn new(curve: Curve, estimator: Box<dyn Estimator>) -> EstResult<Self> {
        let range = Range::full(&curve);
        Self::with_range(curve, range, estimator)
    }

    pub fn with_range(curve: Curve, range: Range, estimator: Box<dyn Estimator>) -> EstResult<Self> {
        let result = estimator.estimate(&curve, &range)?;
        Ok(Self { curve, range, estimator, result })
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn estimator(&self) -> &dyn Estimator {
        self.estimator.as_ref()
    }

    pub fn result(&self) -> &EstimationResult {
        &self.result
    }

    /// Snap `[low, high]` onto the curve and refit.
    pub fn set_range(&mut self, low: f64, high: f64) -> EstResult<&EstimationResult> {
        let range = Range::new(&self.curve, low, high)?;
        self.result = self.estimator.estimate(&self.curve, &range)?;
        self.range = range;
        Ok(&self.result)
    }

    /// Swap the estimator and refit over the current range.
    pub fn set_estimator(&mut self, estimator: Box<dyn Estimator>) -> EstResult<&EstimationResult> {
        self.result = estimator.estimate(&self.curve, &self.range)?;
        self.estimator = estimator;
        Ok(&self.result)
    }

    /// Bootstrap interval of the current estimator over the current range.
    pub fn bootstrap(&self, options: &BootstrapOptions, ctx: &ExecContext) -> EstResult<(f64, f64)> {
        bootstrap_interval(self.estimator.as_ref(), &self.curve, &self.range, options, ctx)
    }

    /// Tab-separated report of the curve with the current fit.
    pub fn report(&self) -> CurveResult<String> {
        report_string(&self.curve, Some(&self.result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        curve::Sign,
        estimation::{DirectEstimator, LogEstimator, kind::EstimatorKind},
    };
    use approx::assert_relative_eq;

    /// Slope 2 on scales 1..16, slope 1 on 16..256.
    fn two_segment_curve() -> Curve {
        let scales: Vec<f64> = (0..9).map(|k| 2f64.powi(k)).collect();
        let values = scales
            .iter()
            .map(|&s| if s <= 16.0 { s * s } else { 16.0 * s })
            .collect();
        Curve::new(scales, values, Sign::Positive).expect("valid curve")
    }

    #[test]
    // Purpose
    // -------
    // Restricting the range recovers each segment's local slope.
    //
    // Given
    // -----
    // - A curve with slope 2 up to scale 16 and slope 1 beyond.
    //
    // Expect
    // ------
    // - Range [1, 16] → 2; range [16, 256] → 1; the stored range follows.
    fn set_range_recovers_segment_slopes() {
        // Arrange
        let mut session =
            FitSession::new(two_segment_curve(), Box::new(LogEstimator::default())).expect("fit");

        // Act
        let low = session.set_range(1.0, 16.0).expect("refit").dimension;
        let high = session.set_range(16.0, 256.0).expect("refit").dimension;

        // Assert
        assert_relative_eq!(low, 2.0, epsilon = 1e-10);
        assert_relative_eq!(high, 1.0, epsilon = 1e-10);
        assert_eq!(session.range().low(), 16.0);
    }

    #[test]
    // Purpose
    // -------
    // A failed refit keeps the previous state.
    fn failed_refit_keeps_previous_result() {
        // Arrange
        let mut session =
            FitSession::new(two_segment_curve(), Box::new(LogEstimator::default())).expect("fit");
        let before = session.result().clone();

        // Act
        let err = session.set_range(1.0, 2.0);

        // Assert
        assert!(err.is_err());
        assert_eq!(session.result(), &before);
        assert_eq!(session.range().high(), 256.0);
    }

    #[test]
    // Purpose
    // -------
    // Swapping the estimator replaces the result and the report carries the
    // fitted column.
    fn set_estimator_replaces_result() {
        // Arrange
        let scales: Vec<f64> = (1..=10).map(f64::from).collect();
        let values = scales.iter().map(|s| s * s).collect();
        let curve = Curve::new(scales, values, Sign::Positive).expect("valid curve");
        let mut session = FitSession::new(curve, Box::new(LogEstimator::default())).expect("fit");

        // Act
        let direct = session.set_estimator(Box::new(DirectEstimator::default())).expect("refit");

        // Assert
        assert_eq!(direct.estimator, EstimatorKind::Direct);
        assert_relative_eq!(direct.dimension, 2.0, epsilon = 1e-6);
        let report = session.report().expect("report");
        assert_eq!(report.lines().count(), 11);
        assert!(report.lines().nth(1).unwrap().split('\t').nth(3).unwrap().parse::<f64>().is_ok());
    }
}
