//! Integration tests for the single-fractal pipeline.
//!
//! Purpose
//! -------
//! - Validate the path a front-end takes: sampling → measurement → curve →
//!   estimation → interval / report, through the public `api` surface.
//!
//! Coverage
//! --------
//! - `api::configure_sampling` / `api::sampling_for`: documented scale sets
//!   and dataset-derived defaults.
//! - `api::compute_curve`: box counting on a filled block and a straight
//!   line; cumulative strategies stay non-decreasing; cancellation.
//! - `api::fit` / `api::bootstrap_confidence_interval`: log vs direct
//!   agreement, bootstrap degeneracy, range sub-selection.
//! - `curve::report_string`: tab-separated layout.
//!
//! Exclusions
//! ----------
//! - Grid, offset and counting-mode details are covered by unit tests in
//!   `measure::box_counting`.
use approx::assert_abs_diff_eq;
use rust_fractal::{
    api,
    curve::{Curve, Monotonicity, REPORT_HEADER, Range, Sign, report_string},
    errors::ErrorKind,
    estimation::{BootstrapOptions, EstimatorKind, PowerLawModel},
    execution::{CancelFlag, ExecContext},
    geometry::{BinaryRaster, Dataset, PolylineSet},
    measure::MeasureKind,
    sampling::{SamplingOptions, Sequence},
};

fn ctx() -> ExecContext {
    let _ = env_logger::builder().is_test(true).try_init();
    ExecContext::new(4).expect("pool should build")
}

/// 64×64 filled block inside an 80×80 raster.
fn block_raster() -> BinaryRaster {
    BinaryRaster::from_fn(80, 80, |c, r| (8..72).contains(&c) && (8..72).contains(&r))
}

fn box_kind() -> MeasureKind {
    MeasureKind::BoxCounting(Default::default())
}

#[test]
// Purpose
// -------
// The documented scale sets come out of the public constructor.
//
// Given
// -----
// - min = 1, max = 10, coef = 2, geometric and arithmetic.
//
// Expect
// ------
// - {1, 2, 4, 8} and {1, 3, 5, 7, 9}.
fn configure_sampling_produces_documented_sets() {
    // Act
    let geometric = api::configure_sampling(1.0, 10.0, 2.0, Sequence::Geometric).expect("valid");
    let arithmetic = api::configure_sampling(1.0, 10.0, 2.0, Sequence::Arithmetic).expect("valid");

    // Assert
    assert_eq!(geometric.values(), &[1.0, 2.0, 4.0, 8.0]);
    assert_eq!(arithmetic.values(), &[1.0, 3.0, 5.0, 7.0, 9.0]);
}

#[test]
// Purpose
// -------
// A filled block has box dimension 2 and the report carries the fit.
//
// Given
// -----
// - 64×64 block, scales 1..64 doubling, log estimator.
//
// Expect
// ------
// - Counts {4096, 1024, 256, 64, 16, 4, 1}; dimension 2, R² = 1.
// - Report: header plus seven rows of four tab-separated columns.
fn block_pipeline_has_dimension_two() {
    // Arrange
    let raster = block_raster();
    let sampling = api::configure_sampling(1.0, 64.0, 2.0, Sequence::Geometric).expect("valid");

    // Act
    let curve = api::compute_curve(&box_kind(), Dataset::Raster(&raster), &sampling, &ctx())
        .expect("box counting succeeds");
    let result = api::fit(&curve, &Range::full(&curve), EstimatorKind::Log, PowerLawModel::default())
        .expect("fit succeeds");
    let report = report_string(&curve, Some(&result)).expect("report");

    // Assert
    assert_eq!(curve.values(), &[4096.0, 1024.0, 256.0, 64.0, 16.0, 4.0, 1.0]);
    assert!(curve.is_monotone(Monotonicity::NonIncreasing));
    assert_abs_diff_eq!(result.dimension, 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.r2, 1.0, epsilon = 1e-9);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], REPORT_HEADER);
    assert_eq!(lines.len(), 8);
    assert!(lines[1..].iter().all(|l| l.split('\t').count() == 4));
}

#[test]
// Purpose
// -------
// A straight 128-unit line has box dimension 1 with a perfect log fit.
fn line_pipeline_has_dimension_one() {
    // Arrange
    let line = PolylineSet::new(vec![vec![[0.0, 0.0], [128.0, 0.0]]]).expect("valid line");
    let sampling = api::configure_sampling(1.0, 64.0, 2.0, Sequence::Geometric).expect("valid");

    // Act
    let curve = api::compute_curve(&box_kind(), Dataset::Vector(&line), &sampling, &ctx())
        .expect("box counting succeeds");
    let result = api::fit(&curve, &Range::full(&curve), EstimatorKind::Log, PowerLawModel::default())
        .expect("fit succeeds");

    // Assert
    assert_eq!(curve.values(), &[128.0, 64.0, 32.0, 16.0, 8.0, 4.0, 2.0]);
    assert_abs_diff_eq!(result.dimension, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.r2, 1.0, epsilon = 1e-9);
}

#[test]
// Purpose
// -------
// Log and direct estimators agree on an exact power law.
//
// Given
// -----
// - y = x² at x = 1..16.
//
// Expect
// ------
// - Both give dimension 2 ± 1e-3 and R² = 1 ± 1e-7.
fn log_and_direct_agree_on_exact_power_law() {
    // Arrange
    let scales: Vec<f64> = (1..=16).map(f64::from).collect();
    let values = scales.iter().map(|s| s * s).collect();
    let curve = Curve::new(scales, values, Sign::Positive).expect("valid curve");
    let range = Range::full(&curve);

    // Act
    let log = api::fit(&curve, &range, EstimatorKind::Log, PowerLawModel::default()).expect("log");
    let direct = api::fit(&curve, &range, EstimatorKind::Direct, PowerLawModel::ScaledWithOffset)
        .expect("direct");

    // Assert
    assert_abs_diff_eq!(log.dimension, 2.0, epsilon = 1e-3);
    assert_abs_diff_eq!(direct.dimension, 2.0, epsilon = 1e-3);
    assert_abs_diff_eq!(log.r2, 1.0, epsilon = 1e-7);
    assert_abs_diff_eq!(direct.r2, 1.0, epsilon = 1e-7);
}

#[test]
// Purpose
// -------
// The bootstrap interval of a noiseless curve collapses onto the estimate.
fn bootstrap_interval_collapses_on_noiseless_curve() {
    // Arrange
    let raster = block_raster();
    let sampling = api::configure_sampling(1.0, 64.0, 2.0, Sequence::Geometric).expect("valid");
    let curve = api::compute_curve(&box_kind(), Dataset::Raster(&raster), &sampling, &ctx())
        .expect("box counting succeeds");
    let options = BootstrapOptions::default().with_iterations(500).with_seed(7);

    // Act
    let (lo, hi) = api::bootstrap_confidence_interval(
        &curve,
        &Range::full(&curve),
        EstimatorKind::Log,
        PowerLawModel::default(),
        &options,
        &ctx(),
    )
    .expect("bootstrap succeeds");

    // Assert
    assert_abs_diff_eq!(lo, 2.0, epsilon = 1e-3);
    assert_abs_diff_eq!(hi, 2.0, epsilon = 1e-3);
}

#[test]
// Purpose
// -------
// Restricting the range recovers the local slope of each segment.
//
// Given
// -----
// - Slope 2 on scales 1..16, slope 1 on 16..256.
//
// Expect
// ------
// - Range [1, 16] → 2, range [16, 256] → 1.
fn range_sub_selection_recovers_segment_slopes() {
    // Arrange
    let scales: Vec<f64> = (0..9).map(|k| 2f64.powi(k)).collect();
    let values = scales.iter().map(|&s| if s <= 16.0 { s * s } else { 16.0 * s }).collect();
    let curve = Curve::new(scales, values, Sign::Positive).expect("valid curve");

    // Act
    let low = Range::new(&curve, 1.0, 16.0).expect("low range");
    let high = Range::new(&curve, 16.0, 256.0).expect("high range");
    let low_fit = api::fit(&curve, &low, EstimatorKind::Log, PowerLawModel::default()).expect("fit");
    let high_fit = api::fit(&curve, &high, EstimatorKind::Log, PowerLawModel::default()).expect("fit");

    // Assert
    assert_abs_diff_eq!(low_fit.dimension, 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(high_fit.dimension, 1.0, epsilon = 1e-9);
}

#[test]
// Purpose
// -------
// Cumulative strategies produce non-decreasing curves on an irregular
// raster, with dataset-derived sampling.
fn cumulative_strategies_are_monotone() {
    // Arrange
    let raster = BinaryRaster::from_fn(48, 48, |c, r| {
        c == r || (c + 2 * r) % 7 == 0 || ((10..20).contains(&c) && r < 12)
    });
    let dataset = Dataset::Raster(&raster);
    let kinds = [
        MeasureKind::Dilation(Default::default()),
        MeasureKind::Correlation,
        MeasureKind::Radial(Default::default()),
    ];

    for kind in kinds {
        // Act
        let sampling =
            api::sampling_for(&kind, &SamplingOptions::default(), dataset).expect("valid sampling");
        let curve = api::compute_curve(&kind, dataset, &sampling, &ctx()).expect("measure succeeds");

        // Assert
        assert!(curve.is_monotone(Monotonicity::NonDecreasing), "{} is not monotone", kind.name());
    }
}

#[test]
// Purpose
// -------
// A raised cancel flag ends the measurement with a cancellation, not data.
fn cancelled_measurement_reports_cancelled() {
    // Arrange
    let raster = block_raster();
    let sampling = api::configure_sampling(1.0, 64.0, 2.0, Sequence::Geometric).expect("valid");
    let cancel = CancelFlag::new();
    let ctx = ctx().with_cancel(cancel.clone());
    cancel.cancel();

    // Act
    let err = api::compute_curve(&box_kind(), Dataset::Raster(&raster), &sampling, &ctx).unwrap_err();

    // Assert
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(err.is_cancelled());
}
