//! measure — multi-scale measurement strategies.
//!
//! Purpose
//! -------
//! Turn a dataset and a [`Sampling`] into a [`Curve`](crate::curve::Curve):
//! one measured value per probe scale.
//!
//! Key behaviors
//! -------------
//! - Box counting (gliding grid, dual cell/feature-driven counting, tiling)
//!   in [`box_counting`].
//! - Cumulative strategies: [`dilation`], [`correlation`], [`radial`].
//! - [`compute_curve`] dispatches on [`MeasureKind`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Empty datasets and invalid configurations are rejected before any
//!   parallel work is dispatched.
//! - Parallel sections reduce with commutative, associative operations
//!   (sum, bitwise OR, min) or merge partial results in a fixed order, so
//!   curves are identical for any worker count.
//! - Cumulative strategies verify a non-decreasing curve before returning.
//!
//! Testing notes
//! -------------
//! - Each strategy carries unit tests on hand-countable shapes; the
//!   pipeline tests under `tests/` cover the documented reference counts.

pub mod box_counting;
pub mod correlation;
pub mod dilation;
pub mod errors;
pub mod grid;
pub mod kind;
pub mod radial;

pub use self::{
    box_counting::{BoxCountingOptions, CountingMode, box_counting, offset_count},
    dilation::DilationOptions,
    errors::{MeasureError, MeasureResult},
    kind::{MeasureKind, compute_curve},
    radial::RadialOptions,
};

use crate::{
    geometry::{BinaryRaster, Dataset, Envelope},
    sampling::Sampling,
};

/// Relative tolerance when comparing sampling and raster resolutions.
const RESOLUTION_TOLERANCE: f64 = 1e-9;

/// Envelope of a non-empty dataset with finite corners.
pub(crate) fn checked_envelope(dataset: &Dataset<'_>) -> MeasureResult<Envelope> {
    if dataset.is_empty() {
        return Err(MeasureError::EmptyDataset);
    }
    let envelope = dataset.envelope().ok_or(MeasureError::EmptyDataset)?;
    if !envelope.is_finite() {
        return Err(MeasureError::NonFiniteEnvelope);
    }
    Ok(envelope)
}

/// Raster window strategies need scales snapped to this raster's pixels.
pub(crate) fn require_raster_sampling(
    measure: &'static str, raster: &BinaryRaster, sampling: &Sampling,
) -> MeasureResult<()> {
    let Some(res) = sampling.resolution() else {
        return Err(MeasureError::RequiresDiscreteSampling { measure });
    };
    let pixel = raster.resolution();
    if (res - pixel).abs() > RESOLUTION_TOLERANCE * pixel {
        return Err(MeasureError::ResolutionMismatch { sampling: res, raster: pixel });
    }
    Ok(())
}
