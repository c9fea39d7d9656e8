//! api — top-level entry points for front-ends.
//!
//! Purpose
//! -------
//! Offer the small surface a GIS or batch layer needs: build a sampling,
//! measure a curve, fit it, bootstrap it, and compute a multifractal
//! spectrum. Every function returns [`FractalResult`], so callers classify
//! failures with [`FractalError::kind`](crate::errors::FractalError::kind).
//!
//! Conventions
//! -----------
//! - Work runs on the pool of the [`ExecContext`] passed in; nothing here
//!   creates threads or global state.
//! - Configuration and data errors surface before any parallel work starts.
use log::debug;

use crate::{
    config::{EstimationConfig, MultifractalConfig},
    curve::{Curve, Range},
    errors::FractalResult,
    estimation::{
        BootstrapOptions, EstimationResult, EstimatorKind, PowerLawModel, bootstrap_interval,
        make_estimator,
    },
    execution::ExecContext,
    geometry::Dataset,
    inference::DEFAULT_CONFIDENCE,
    measure::{self, MeasureKind},
    multifractal::{MultifractalAnalysis, MultifractalSpectrum},
    optimization::least_squares::LmOptions,
    sampling::{Sampling, SamplingOptions, Sequence},
};

/// Continuous sampling from explicit bounds.
pub fn configure_sampling(
    min_size: f64, max_size: f64, coef: f64, sequence: Sequence,
) -> FractalResult<Sampling> {
    Ok(Sampling::new(min_size, max_size, coef, sequence)?)
}

/// Sampling for running `kind` on `dataset`.
///
/// Zero bounds resolve against the dataset (minimum: resolution; maximum:
/// `options.heuristic`, or the strategy's own heuristic when unset). Raster
/// strategies that walk pixel windows get scales snapped to the raster's
/// pixels.
pub fn sampling_for(
    kind: &MeasureKind, options: &SamplingOptions, dataset: Dataset<'_>,
) -> FractalResult<Sampling> {
    let discrete = options.discrete
        || (matches!(dataset, Dataset::Raster(_)) && kind.needs_discrete_raster_sampling());
    let sampling = options
        .with_discrete(discrete)
        .or_heuristic(kind.max_heuristic())
        .resolve(dataset.envelope().as_ref(), dataset.resolution())?;
    debug!("api: {} sampling on {} -> {:?}", kind.name(), dataset.label(), sampling.values());
    Ok(sampling)
}

/// Measure `dataset` with `kind` at every sampling scale.
pub fn compute_curve(
    kind: &MeasureKind, dataset: Dataset<'_>, sampling: &Sampling, ctx: &ExecContext,
) -> FractalResult<Curve> {
    Ok(measure::compute_curve(kind, dataset, sampling, ctx)?)
}

/// Fit `curve` over `range` with default optimizer settings and a 95 %
/// analytic interval. `model` only affects the direct estimator.
pub fn fit(
    curve: &Curve, range: &Range, kind: EstimatorKind, model: PowerLawModel,
) -> FractalResult<EstimationResult> {
    let estimator = make_estimator(kind, model, LmOptions::default(), DEFAULT_CONFIDENCE);
    Ok(estimator.estimate(curve, range)?)
}

/// Fit with a full [`EstimationConfig`]; the sequence picks the default
/// estimator.
pub fn fit_with_config(
    curve: &Curve, range: &Range, config: &EstimationConfig, sequence: Sequence,
) -> FractalResult<EstimationResult> {
    Ok(config.build_estimator(sequence)?.estimate(curve, range)?)
}

/// Percentile bootstrap interval of the dimension.
pub fn bootstrap_confidence_interval(
    curve: &Curve, range: &Range, kind: EstimatorKind, model: PowerLawModel,
    options: &BootstrapOptions, ctx: &ExecContext,
) -> FractalResult<(f64, f64)> {
    let estimator = make_estimator(kind, model, LmOptions::default(), options.level);
    Ok(bootstrap_interval(estimator.as_ref(), curve, range, options, ctx)?)
}

/// Multifractal spectrum of `dataset` over `q_values`, optionally restricted
/// to `range = (low, high)`.
pub fn compute_multifractal_spectrum(
    dataset: Dataset<'_>, sampling: &Sampling, q_values: &[f64], range: Option<(f64, f64)>,
    ctx: &ExecContext,
) -> FractalResult<MultifractalSpectrum> {
    let mut analysis = MultifractalAnalysis::new(dataset, sampling, ctx)?;
    analysis.set_q_values(q_values)?;
    if let Some((low, high)) = range {
        analysis.set_range(low, high)?;
    }
    Ok(analysis.spectrum()?.clone())
}

/// [`compute_multifractal_spectrum`] driven by a [`MultifractalConfig`].
pub fn multifractal_from_config(
    dataset: Dataset<'_>, config: &MultifractalConfig, ctx: &ExecContext,
) -> FractalResult<MultifractalSpectrum> {
    let sampling =
        config.sampling_options().resolve(dataset.envelope().as_ref(), dataset.resolution())?;
    compute_multifractal_spectrum(dataset, &sampling, &config.q_values, config.range, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::ErrorKind, geometry::BinaryRaster};

    #[test]
    // Purpose
    // -------
    // Invalid sampling bounds are configuration errors raised before any
    // measurement.
    fn configure_sampling_rejects_inverted_bounds() {
        let err = configure_sampling(10.0, 1.0, 2.0, Sequence::Geometric).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    // Purpose
    // -------
    // Raster correlation gets pixel-snapped scales even when the options do
    // not ask for them.
    //
    // Given
    // -----
    // - A 16×16 filled raster, default options (bounds from the dataset).
    //
    // Expect
    // ------
    // - Discrete sampling at resolution 1 with odd scales up to 8.
    fn sampling_for_snaps_raster_window_strategies() {
        // Arrange
        let raster = BinaryRaster::from_fn(16, 16, |_, _| true);

        // Act
        let sampling = sampling_for(
            &MeasureKind::Correlation,
            &SamplingOptions::default(),
            Dataset::Raster(&raster),
        )
        .expect("valid sampling");

        // Assert
        assert_eq!(sampling.resolution(), Some(1.0));
        assert_eq!(sampling.values(), &[1.0, 3.0, 5.0]);
    }

    #[test]
    // Purpose
    // -------
    // Box counting grids up to the larger envelope side whether the options
    // come from code defaults or from a sparse JSON document.
    //
    // Given
    // -----
    // - A filled 100×40 raster.
    // - Default options, and `{"method": "box_counting", "sampling": {"coef": 2}}`.
    //
    // Expect
    // ------
    // - max_size = 100 in both cases; correlation keeps half the smaller
    //   side (20).
    fn sampling_for_uses_strategy_heuristic_when_unset() {
        // Arrange
        let raster = BinaryRaster::from_fn(100, 40, |_, _| true);
        let dataset = Dataset::Raster(&raster);
        let box_kind = MeasureKind::BoxCounting(Default::default());
        let config: crate::config::MethodConfig =
            crate::config::parse_config(r#"{"method": "box_counting", "sampling": {"coef": 2}}"#)
                .expect("valid config");
        let loaded_kind = config.measure_kind().expect("single-curve method");

        // Act
        let from_defaults =
            sampling_for(&box_kind, &SamplingOptions::default(), dataset).expect("valid sampling");
        let from_json = sampling_for(&loaded_kind, config.sampling(), dataset).expect("valid sampling");
        let correlation = sampling_for(&MeasureKind::Correlation, &SamplingOptions::default(), dataset)
            .expect("valid sampling");

        // Assert
        assert_eq!(from_defaults.max_size(), 100.0);
        assert_eq!(from_json.max_size(), 100.0);
        assert_eq!(correlation.max_size(), 20.0);
    }
}
