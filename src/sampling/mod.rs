//! sampling — probe scale sequences.
//!
//! Purpose
//! -------
//! Generate the ordered set of scales a measurement strategy probes
//! (geometric or arithmetic progression, optionally snapped to odd pixel
//! multiples) and map arbitrary measured distances back to probe scales.
//!
//! Key behaviors
//! -------------
//! - [`Sampling`] validates its configuration eagerly; every failure is a
//!   [`SamplingError`] raised before measurement starts.
//! - Discrete sampling snaps `v` to `(2i + 1) * res` with
//!   `i = round((v / res - 1) / 2)`, so a radius-`i` square window in pixels
//!   has exactly the probed side.
//! - [`SamplingOptions::resolve`] fills zero bounds from the dataset: the
//!   minimum from its resolution, the maximum from a [`MaxHeuristic`].
//!
//! Conventions
//! -----------
//! - Scales are linear sizes in dataset units (box side, window side,
//!   radius).

pub mod errors;
pub mod scales;
pub mod sequence;
pub mod validation;

pub use self::{
    errors::{SamplingError, SamplingResult},
    scales::{Sampling, SamplingOptions, snap_discrete},
    sequence::{MaxHeuristic, Sequence},
};
