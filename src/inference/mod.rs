//! inference — standard errors and intervals for fitted power laws.
//!
//! Purpose
//! -------
//! Post-estimation uncertainty for the estimators: Gauss–Newton standard
//! errors for least-squares fits, Student-t critical values and p-values,
//! and percentile intervals for bootstrap samples.
//!
//! Key behaviors
//! -------------
//! - [`gauss_newton_standard_errors`]: `σ² (JᵀJ)⁺` with an eigen-based
//!   pseudoinverse (`nalgebra`).
//! - [`student_t_quantile`], [`two_sided_p_value`], [`confidence_interval`]
//!   on `statrs::distribution::StudentsT`.
//! - [`percentile`] / [`percentile_interval`]: linear-interpolation (type 7)
//!   sample percentiles.
//!
//! Conventions
//! -----------
//! - Confidence levels are two-sided and lie strictly in `(0, 1)`.
//! - Routines are pure; failures are reported via [`InferenceResult`].

pub mod errors;
pub mod intervals;
pub mod standard_errors;

pub use self::{
    errors::{InferenceError, InferenceResult},
    intervals::{
        DEFAULT_CONFIDENCE, confidence_interval, percentile, percentile_interval,
        student_t_quantile, two_sided_p_value,
    },
    standard_errors::gauss_newton_standard_errors,
};
