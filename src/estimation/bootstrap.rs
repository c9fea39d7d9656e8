//! Percentile bootstrap of the fitted dimension.
//!
//! Each iteration draws the range points with replacement from its own
//! `StdRng` seeded with `seed + iteration`, refits, and records
//! `sign · slope` (log) or `sign · D` (direct). Iterations run on the
//! context's pool and are collected in iteration order, so the interval is
//! the same for any worker count.
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    errors::{EstResult, EstimationError},
    estimator::Estimator,
    validation::{distinct_scales, range_points},
};
use crate::{
    curve::{Curve, Range, Sign},
    execution::ExecContext,
    inference::{DEFAULT_CONFIDENCE, percentile_interval},
};

/// Redraws allowed per iteration before giving up on a degenerate range.
pub const MAX_REDRAWS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapOptions {
    /// Iteration count; the estimator's default when `None`.
    pub iterations: Option<usize>,
    pub seed: u64,
    pub level: f64,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self { iterations: None, seed: 0, level: DEFAULT_CONFIDENCE }
    }
}

impl BootstrapOptions {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Draw one resample with at least `min_distinct` distinct scales, sorted by
/// scale.
fn draw_resample(
    points: &[(f64, f64)], min_distinct: usize, seed: u64, iteration: usize,
) -> EstResult<Vec<(f64, f64)>> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(iteration as u64));
    let n = points.len();
    for _ in 0..MAX_REDRAWS {
        let mut sample: Vec<(f64, f64)> = (0..n).map(|_| points[rng.gen_range(0..n)]).collect();
        if distinct_scales(&sample) >= min_distinct {
            sample.sort_by(|a, b| a.0.total_cmp(&b.0));
            return Ok(sample);
        }
    }
    Err(EstimationError::DegenerateResample { iteration })
}

/// Bootstrap confidence interval for the dimension over `range`.
///
/// # Errors
/// - `InvalidBootstrap` for zero iterations or a level outside `(0, 1)`.
/// - Range and preflight errors of the estimator, before any resampling.
/// - The first failing iteration's error (in iteration order).
/// - `Cancelled` when the context's flag is raised; partial results are
///   discarded.
pub fn bootstrap_interval(
    estimator: &dyn Estimator, curve: &Curve, range: &Range, options: &BootstrapOptions,
    ctx: &ExecContext,
) -> EstResult<(f64, f64)> {
    let iterations = options.iterations.unwrap_or_else(|| estimator.bootstrap_iterations());
    if iterations == 0 {
        return Err(EstimationError::InvalidBootstrap { reason: "iterations must be positive" });
    }
    if !(options.level > 0.0 && options.level < 1.0) {
        return Err(EstimationError::InvalidBootstrap { reason: "level must lie in (0, 1)" });
    }
    let sign: Sign = curve.sign();
    let (start, _) = range.indices(curve)?;
    let points = range_points(curve, range)?;
    estimator.preflight(sign, &points, start)?;
    let min_distinct = estimator.parameter_count().max(2);
    let available = distinct_scales(&points);
    if available < min_distinct {
        return Err(EstimationError::InsufficientPoints { found: available, required: min_distinct });
    }

    let outcomes: Vec<EstResult<f64>> = ctx
        .install(|| {
            (0..iterations)
                .into_par_iter()
                .map(|i| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    Some(
                        draw_resample(&points, min_distinct, options.seed, i)
                            .and_then(|sample| estimator.resample_dimension(&sample, sign)),
                    )
                })
                .collect::<Option<Vec<_>>>()
        })
        .ok_or(EstimationError::Cancelled)?;
    let dimensions = outcomes.into_iter().collect::<EstResult<Vec<f64>>>()?;

    let interval = percentile_interval(&dimensions, options.level)?;
    debug!(
        "{} bootstrap: {iterations} iteration(s), interval [{:.6}, {:.6}]",
        estimator.kind().name(),
        interval.0,
        interval.1
    );
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        estimation::{DirectEstimator, LogEstimator},
        execution::CancelFlag,
    };
    use approx::assert_abs_diff_eq;

    fn noisy_curve() -> Curve {
        let scales: Vec<f64> = (0..10).map(|k| 2f64.powi(k)).collect();
        let wobble = [1.0, 1.1, 0.9, 1.05, 0.95, 1.0, 1.08, 0.92, 1.0, 1.03];
        let values = scales.iter().zip(wobble).map(|(s, w)| s.powf(1.3) * w).collect();
        Curve::new(scales, values, Sign::Positive).expect("valid curve")
    }

    #[test]
    // Purpose
    // -------
    // The interval is reproducible for a seed and independent of the pool
    // size.
    //
    // Given
    // -----
    // - A noisy power law, 500 iterations, seed 7, on 1 and 4 workers.
    //
    // Expect
    // ------
    // - Identical intervals that bracket the point estimate.
    fn bootstrap_is_deterministic_across_pools() {
        // Arrange
        let curve = noisy_curve();
        let range = Range::full(&curve);
        let opts = BootstrapOptions::default().with_iterations(500).with_seed(7);
        let est = LogEstimator::default();
        let one = ExecContext::sequential().expect("pool");
        let four = ExecContext::new(4).expect("pool");

        // Act
        let a = bootstrap_interval(&est, &curve, &range, &opts, &one).expect("bootstrap");
        let b = bootstrap_interval(&est, &curve, &range, &opts, &four).expect("bootstrap");
        let point = est.estimate(&curve, &range).expect("fit").dimension;

        // Assert
        assert_eq!(a, b);
        assert!(a.0 <= point && point <= a.1);
    }

    #[test]
    // Purpose
    // -------
    // For a noiseless curve every resample gives the same slope, so the
    // interval collapses onto the dimension for both estimators.
    fn bootstrap_collapses_on_noiseless_curve() {
        // Arrange
        let scales: Vec<f64> = (1..=10).map(f64::from).collect();
        let values = scales.iter().map(|s| s * s).collect();
        let curve = Curve::new(scales, values, Sign::Positive).expect("valid curve");
        let range = Range::full(&curve);
        let ctx = ExecContext::new(2).expect("pool");
        let opts = BootstrapOptions::default().with_iterations(200);

        // Act
        let log = bootstrap_interval(&LogEstimator::default(), &curve, &range, &opts, &ctx)
            .expect("log bootstrap");
        let direct = bootstrap_interval(&DirectEstimator::default(), &curve, &range, &opts, &ctx)
            .expect("direct bootstrap");

        // Assert
        for (lo, hi) in [log, direct] {
            assert_abs_diff_eq!(lo, 2.0, epsilon = 1e-3);
            assert_abs_diff_eq!(hi, 2.0, epsilon = 1e-3);
        }
    }

    #[test]
    // Purpose
    // -------
    // A raised cancel flag yields `Cancelled`, not a partial interval.
    fn bootstrap_observes_cancellation() {
        // Arrange
        let curve = noisy_curve();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let ctx = ExecContext::new(2).expect("pool").with_cancel(cancel);

        // Act
        let err = bootstrap_interval(
            &LogEstimator::default(),
            &curve,
            &Range::full(&curve),
            &BootstrapOptions::default(),
            &ctx,
        )
        .unwrap_err();

        // Assert
        assert_eq!(err, EstimationError::Cancelled);
    }

    #[test]
    fn bootstrap_rejects_zero_iterations() {
        let curve = noisy_curve();
        let ctx = ExecContext::sequential().expect("pool");
        let opts = BootstrapOptions::default().with_iterations(0);
        let err = bootstrap_interval(&LogEstimator::default(), &curve, &Range::full(&curve), &opts, &ctx)
            .unwrap_err();
        assert!(matches!(err, EstimationError::InvalidBootstrap { .. }));
    }
}
