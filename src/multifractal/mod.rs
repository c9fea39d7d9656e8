//! multifractal — q-moment generalisation of box counting.
//!
//! Purpose
//! -------
//! Measure how box mass concentrates across scales and summarise it as the
//! generalised dimensions `D_q` and the singularity spectrum `f(α)`.
//!
//! Key behaviors
//! -------------
//! - [`mass_profiles`]: normalised box masses per sampling scale, parallel
//!   over scales.
//! - [`MultifractalAnalysis`]: per-q curves `Z(q, s) = Σ p^q` fitted with
//!   the log estimator; `τ(q) = −slope`, `D_q = τ / (1 − q)`, `D_1` from
//!   `Σ p ln p`, Legendre transform by backward differences.
//! - [`holder_map`]: per-pixel local exponents for rasters; failed pixels
//!   are NaN.
//!
//! Invariants & assumptions
//! ------------------------
//! - q sets are finite, sorted and deduplicated before use.
//! - Cached fits are discarded when the range changes; cached curves are
//!   reused for as long as the analysis lives.
//! - Box masses are accumulated in cell order, so results do not depend on
//!   the worker count.

pub mod analysis;
pub mod errors;
pub mod local;
pub mod moments;
pub mod spectrum;

pub use self::{
    analysis::MultifractalAnalysis,
    errors::{MultifractalError, MultifractalResult},
    local::holder_map,
    moments::{MassProfile, mass_profile, mass_profiles, moment_curve},
    spectrum::{MultifractalSpectrum, SpectrumPoint, default_q_values, normalize_q_values},
};
