//! least_squares — Argmin-backed Levenberg–Marquardt for residual models.
//!
//! Purpose
//! -------
//! Provide a small, well-typed façade over `argmin` for non-linear least
//! squares. Callers implement [`ResidualModel`] for their model, choose
//! [`LmOptions`], and obtain a [`FitOutcome`] without touching Argmin
//! types.
//!
//! Key behaviors
//! -------------
//! - Adapt user models into Argmin problems via [`ArgMinAdapter`]
//!   (residual operator, Jacobian, cost `r·r`).
//! - Use analytic Jacobians when provided, finite differences otherwise.
//! - Solve with [`LevenbergMarquardt`], an argmin `Solver` driven by the
//!   shared `Executor`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Residuals and Jacobians are validated for shape and finiteness on
//!   every evaluation.
//! - Reaching `max_iter` is not convergence; `FitOutcome::converged` is
//!   `true` only for a solver-reported convergence.
//!
//! Downstream usage
//! ----------------
//! - The direct power-law estimator implements [`ResidualModel`] for its
//!   four model forms and calls [`minimize`].
//! - Inference code reuses the Jacobian at `theta_hat` through
//!   [`ArgMinAdapter`] for Gauss–Newton standard errors.
//!
//! Testing notes
//! -------------
//! - Unit tests cover validation helpers, finite-difference Jacobians,
//!   the damped step, termination mapping and an exact exponential fit.
pub mod adapter;
pub mod api;
pub mod run;
pub mod solver;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::{
    adapter::ArgMinAdapter,
    api::minimize,
    solver::LevenbergMarquardt,
    traits::{FitOutcome, LmOptions, ResidualModel, Tolerances},
    types::{Cost, FnEvalMap, Grad, JacobianMatrix, Residuals, Theta},
};

pub mod prelude {
    pub use super::{
        FitOutcome, LmOptions, ResidualModel, Theta, Tolerances, minimize,
    };
}
