//! optimization — least-squares stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used by the direct power-law estimator:
//! an Argmin-backed Levenberg–Marquardt solver for residual models and a
//! single error/result surface.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing sums of squared residuals**
//!   (`least_squares`), including configuration of stopping criteria.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Conventions
//! -----------
//! - Parameters, residuals and Jacobians use `ndarray`-based aliases
//!   (`Theta`, `Residuals`, `JacobianMatrix`).
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - Progress is reported through the `log` facade at `debug`/`trace`
//!   level only.

pub mod errors;
pub mod least_squares;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::least_squares::prelude::*;
}
