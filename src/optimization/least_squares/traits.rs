//! Public API surface for non-linear least squares.
//!
//! - [`ResidualModel`]: trait users implement for their model.
//! - [`LmOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`FitOutcome`]: normalized result returned by the high-level
//!   `minimize` API.
//!
//! Convention: the optimizer minimizes the sum of squared residuals
//! `c(θ) = r(θ)·r(θ)`. Residuals are `model − observation`; an analytic
//! Jacobian, when provided, is `∂r/∂θ` with one row per observation.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{
        types::{Cost, DEFAULT_INITIAL_LAMBDA, FnEvalMap, Grad, JacobianMatrix, Residuals, Theta},
        validation::{
            validate_theta_hat, validate_value, verify_lambda, verify_tol_cost, verify_tol_grad,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;

/// User-implemented residual interface.
///
/// - `type Data`: observations carried into every call.
///
/// Required:
/// - `observation_count(&Data)`: length of the residual vector.
/// - `residuals(&Theta, &Data)`: `r(θ)`; return a descriptive `OptError` for
///   parameters the model cannot evaluate.
/// - `check(&Theta, &Data)`: reject obviously invalid `θ`/`data` pairs.
///   Called once before optimization.
///
/// Optional:
/// - `jacobian(&Theta, &Data)`: analytic `∂r/∂θ`. If not implemented,
///   central finite differences are used.
pub trait ResidualModel {
    type Data: 'static;

    // Required methods
    fn observation_count(&self, data: &Self::Data) -> usize;
    fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn jacobian(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<JacobianMatrix> {
        Err(OptError::JacobianNotImplemented)
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — stopping rules and iteration limit.
/// - `initial_lambda: f64` — starting Levenberg–Marquardt damping.
///
/// Default:
/// - `tols`: `tol_grad = 1e-10`, `tol_cost = 1e-12`, `max_iter = 200`
/// - `initial_lambda`: `1e-3`
#[derive(Debug, Clone, PartialEq)]
pub struct LmOptions {
    pub tols: Tolerances,
    pub initial_lambda: f64,
}

impl LmOptions {
    /// Create a new set of optimizer options.
    ///
    /// # Errors
    /// [`OptError::InvalidLambda`] if `initial_lambda` is non-finite or ≤ 0.
    pub fn new(tols: Tolerances, initial_lambda: f64) -> OptResult<Self> {
        verify_lambda(initial_lambda)?;
        Ok(Self { tols, initial_lambda })
    }
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-10), tol_cost: Some(1e-12), max_iter: Some(200) },
            initial_lambda: DEFAULT_INITIAL_LAMBDA,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: converged when `‖Jᵀr‖∞` falls below this threshold.
/// - `tol_cost`: converged when the relative change of the cost between
///   accepted steps falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations; hitting it is not
///   convergence.
///
/// Any field can be `None` but **at least one** of the three must be
/// provided (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `sse`: sum of squared residuals at `theta_hat`.
/// - `converged`: `true` only when the solver itself reported convergence;
///   reaching the iteration cap is not convergence.
/// - `status`: termination reason, e.g. `"SolverConverged"` or
///   `"MaxItersReached"`.
/// - `iterations`: number of accepted steps.
/// - `fn_evals`: argmin's evaluation counters (`operator_count`,
///   `jacobian_count`, ...).
/// - `grad_norm`: norm of the last cost gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub theta_hat: Theta,
    pub sse: Cost,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl FitOutcome {
    /// Build a validated [`FitOutcome`] from raw solver state.
    ///
    /// # Errors
    /// Propagates validation errors for `theta_hat` or `sse`.
    pub fn new(
        theta_hat_opt: Option<Theta>, sse: Cost, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(sse)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "NotTerminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                (matches!(reason, TerminationReason::SolverConverged), format!("{reason:?}"))
            }
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            sse,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }
}
