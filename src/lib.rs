//! rust_fractal — fractal dimension estimation for rasters and vector layers.
//!
//! Purpose
//! -------
//! Estimate the scaling (fractal) dimension of spatial datasets by measuring
//! a quantity at a sequence of scales and fitting a power law to the
//! resulting `(scale, measure)` curve, and generalise the measurement to
//! q-moment (multifractal) spectra.
//!
//! Key behaviors
//! -------------
//! - [`sampling`]: geometric/arithmetic scale sequences, pixel snapping,
//!   ceiling lookup and dataset-derived defaults.
//! - [`measure`]: gliding-grid box counting plus dilation, correlation and
//!   radial mass strategies, parallel over an explicit worker pool.
//! - [`curve`]: measured curves, fitting ranges and the tab-separated
//!   report.
//! - [`estimation`]: log-log OLS and direct Levenberg–Marquardt power-law
//!   fits (four models), analytic and bootstrap intervals, fit sessions.
//! - [`multifractal`]: `Z(q)` curves, `τ(q)`, `D_q`, `f(α)` and local
//!   Hölder maps.
//! - [`api`]: the small entry-point surface used by front-ends.
//!
//! Invariants & assumptions
//! ------------------------
//! - No global executor: every parallel computation runs on the pool of an
//!   [`execution::ExecContext`] passed in by the caller and observes its
//!   cancel flag.
//! - Reductions are order-independent, so results never depend on the
//!   number of workers.
//! - Configuration and data errors are reported before parallel work
//!   starts; non-convergence is reported, never retried.
//!
//! Conventions
//! -----------
//! - Scales are linear sizes in dataset units; raster scales are odd pixel
//!   multiples when snapped.
//! - `dimension = sign · slope`, with `sign = −1` for decreasing measures
//!   (box counts, moment sums) and `+1` for cumulative ones.
//! - Subtree modules return their own error types; [`errors::FractalError`]
//!   wraps them all and classifies them with [`errors::ErrorKind`].
//!
//! Downstream usage
//! ----------------
//! - Most callers need only [`prelude`]; the `fractal_batch` binary shows a
//!   complete run from a binary image.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds end-to-end
//!   pipelines on synthetic rasters and vector layers.

pub mod api;
pub mod config;
pub mod curve;
pub mod errors;
pub mod estimation;
pub mod execution;
pub mod geometry;
pub mod inference;
pub mod measure;
pub mod multifractal;
pub mod optimization;
pub mod sampling;

pub mod prelude {
    pub use crate::{
        api::{
            bootstrap_confidence_interval, compute_curve, compute_multifractal_spectrum,
            configure_sampling, fit, sampling_for,
        },
        config::{EstimationConfig, MethodConfig},
        curve::{Curve, Range, Sign},
        errors::{ErrorKind, FractalError, FractalResult},
        estimation::{
            BootstrapOptions, EstimationResult, Estimator, EstimatorKind, FitSession, PowerLawModel,
        },
        execution::{CancelFlag, ExecContext},
        geometry::{BinaryRaster, Dataset, FeatureSet, PointSet, PolygonSet, PolylineSet},
        measure::MeasureKind,
        multifractal::{MultifractalAnalysis, MultifractalSpectrum},
        sampling::{Sampling, SamplingOptions, Sequence},
    };
}
