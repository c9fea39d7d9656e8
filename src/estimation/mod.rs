//! estimation — power-law fits over a curve range.
//!
//! Purpose
//! -------
//! Turn a [`Curve`](crate::curve::Curve) and a [`Range`](crate::curve::Range)
//! into a dimension estimate with goodness of fit and uncertainty.
//!
//! Key behaviors
//! -------------
//! - [`LogEstimator`]: OLS on `(ln x, ln y)`; R², slope p-value, analytic
//!   Student-t interval.
//! - [`DirectEstimator`]: Levenberg–Marquardt fit of a [`PowerLawModel`]
//!   (`AD+C`, `AD`, `D+C`, `D`) on raw values; R², BIC, Gauss–Newton
//!   interval.
//! - [`bootstrap_interval`]: percentile bootstrap (10 000 iterations for
//!   log, 2 000 for direct by default), parallel and deterministic.
//! - [`FitSession`]: owns the current fit and refits on range or estimator
//!   changes.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every fit needs at least three range points; NaN/∞ inside the range is
//!   a data error, never dropped.
//! - `dimension = sign · slope` (log) or `sign · D` (direct).
//! - Non-convergence of the direct fit is reported, not retried.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each estimator on exact and noisy power laws, the
//!   model table, bootstrap determinism and degeneracy, and session refits.

pub mod bootstrap;
pub mod direct_estimation;
pub mod errors;
pub mod estimator;
pub mod kind;
pub mod log_estimation;
pub mod models;
pub mod ols;
pub mod result;
pub mod session;
pub mod validation;

pub use self::{
    bootstrap::{BootstrapOptions, bootstrap_interval},
    direct_estimation::{DirectEstimator, PowerLawData, PowerLawResiduals, bic},
    errors::{EstResult, EstimationError},
    estimator::{Estimator, make_estimator},
    kind::EstimatorKind,
    log_estimation::LogEstimator,
    models::PowerLawModel,
    ols::OlsFit,
    result::EstimationResult,
    session::FitSession,
};
