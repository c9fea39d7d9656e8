//! least_squares::types — shared numeric aliases.
//!
//! Purpose
//! -------
//! Centralize the numeric types used by the least-squares optimizer so the
//! rest of the optimization code stays agnostic to `ndarray` and Argmin
//! generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors with one entry per free
//!   parameter.
//! - `Residuals` has one entry per observation; `JacobianMatrix` is
//!   `m × n` with row `i` holding `∂r_i/∂θ`.
//! - `Cost` is the sum of squared residuals `r·r` (not halved).
use argmin::core::IterState;
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient of the cost, `Jᵀr` up to a factor of two.
pub type Grad = Array1<f64>;

/// Residual vector `r(θ) = model(θ) − y`.
pub type Residuals = Array1<f64>;

/// Residual Jacobian, `m × n`.
pub type JacobianMatrix = Array2<f64>;

/// Sum of squared residuals.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps argmin's counter names (e.g., `"operator_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Executor state shared by the solver and the runner.
pub type LmState = IterState<Theta, Grad, (), (), (), f64>;

/// Default starting damping.
pub const DEFAULT_INITIAL_LAMBDA: f64 = 1e-3;

/// Damping above which no step can reduce the cost any further.
pub const MAX_LAMBDA: f64 = 1e16;

/// Factor applied to the damping on rejected/accepted steps.
pub const LAMBDA_FACTOR: f64 = 10.0;
