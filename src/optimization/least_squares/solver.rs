//! least_squares::solver — Levenberg–Marquardt as an argmin `Solver`.
//!
//! Purpose
//! -------
//! Minimize `c(θ) = r(θ)·r(θ)` for a residual operator with a Jacobian,
//! plugging into argmin's `Executor` so iteration limits, counters and
//! termination bookkeeping are shared with the rest of the crate.
//!
//! Key behaviors
//! -------------
//! - Each iteration solves the damped normal equations
//!   `(JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr` (Cholesky, LU fallback) and proposes
//!   `θ − δ`.
//! - A proposal is accepted when its cost is finite and not larger than the
//!   current cost; `λ` is then divided by 10. Rejected proposals multiply
//!   `λ` by 10 and are retried within the same iteration.
//! - When `λ` exceeds [`MAX_LAMBDA`] no step can reduce the cost any more
//!   and the solver reports convergence at the current point.
//!
//! Invariants & assumptions
//! ------------------------
//! - The state always holds the best accepted parameters; cost never
//!   increases across iterations.
//! - Diagonal scaling entries are floored at [`DIAG_FLOOR`] so parameters
//!   with a vanishing column still receive damping.
//!
//! Conventions
//! -----------
//! - The stored gradient is `Jᵀr` (half the true cost gradient).
//! - Cost-change convergence is relative:
//!   `|c_prev − c| ≤ tol_cost · max(|c_prev|, |c|)`, which also covers an
//!   exact fit (`0 = 0`).
use argmin::core::{
    CostFunction, Error, Jacobian, Operator, Problem, Solver, State, TerminationReason,
    TerminationStatus, KV,
};
use log::trace;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{
        adapter::sum_of_squares,
        traits::LmOptions,
        types::{Grad, JacobianMatrix, LAMBDA_FACTOR, LmState, MAX_LAMBDA, Residuals, Theta},
    },
};

/// Lower bound for the Marquardt scaling entries.
pub const DIAG_FLOOR: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevenbergMarquardt {
    lambda: f64,
    tol_grad: Option<f64>,
    tol_cost: Option<f64>,
    stalled: bool,
}

impl LevenbergMarquardt {
    /// Build a solver from validated options; `max_iter` is applied by the
    /// runner on the executor state.
    pub fn new(opts: &LmOptions) -> Self {
        Self {
            lambda: opts.initial_lambda,
            tol_grad: opts.tols.tol_grad,
            tol_cost: opts.tols.tol_cost,
            stalled: false,
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

/// `(Jᵀr, JᵀJ)` for the current linearization.
fn normal_equations(jacobian: &JacobianMatrix, residuals: &Residuals) -> (Grad, JacobianMatrix) {
    let jt = jacobian.t();
    (jt.dot(residuals), jt.dot(jacobian))
}

/// Solve `(JᵀJ + λ·D) δ = Jᵀr`; `None` when the system is singular.
fn damped_step(jtj: &JacobianMatrix, jtr: &Grad, lambda: f64) -> Option<Theta> {
    let n = jtr.len();
    let a = DMatrix::from_fn(n, n, |i, j| {
        let base = jtj[[i, j]];
        if i == j { base + lambda * base.max(DIAG_FLOOR) } else { base }
    });
    let b = DVector::from_iterator(n, jtr.iter().copied());
    let delta = match a.clone().cholesky() {
        Some(chol) => chol.solve(&b),
        None => a.lu().solve(&b)?,
    };
    if delta.iter().all(|v| v.is_finite()) {
        Some(Theta::from_iter(delta.iter().copied()))
    } else {
        None
    }
}

fn current_param(state: &LmState) -> OptResult<Theta> {
    state.get_param().cloned().ok_or(OptError::NotInitialized {
        text: "Levenberg-Marquardt requires an initial parameter vector".to_string(),
    })
}

impl<O> Solver<O, LmState> for LevenbergMarquardt
where
    O: Operator<Param = Theta, Output = Residuals>
        + Jacobian<Param = Theta, Jacobian = JacobianMatrix>
        + CostFunction<Param = Theta, Output = f64>,
{
    const NAME: &'static str = "Levenberg-Marquardt";

    fn init(&mut self, problem: &mut Problem<O>, state: LmState) -> Result<(LmState, Option<KV>), Error> {
        let theta = current_param(&state)?;
        let residuals = problem.apply(&theta)?;
        let cost = sum_of_squares(&residuals)?;
        self.stalled = false;
        Ok((state.cost(cost), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: LmState,
    ) -> Result<(LmState, Option<KV>), Error> {
        let theta = current_param(&state)?;
        let cost = state.get_cost();
        let residuals = problem.apply(&theta)?;
        let jacobian = problem.jacobian(&theta)?;
        let (jtr, jtj) = normal_equations(&jacobian, &residuals);

        while self.lambda <= MAX_LAMBDA {
            let candidate = damped_step(&jtj, &jtr, self.lambda).map(|delta| &theta - &delta);
            if let Some(candidate) = candidate {
                // Proposals the model cannot evaluate are treated like uphill steps.
                let trial = problem.apply(&candidate).ok().and_then(|r| sum_of_squares(&r).ok());
                if let Some(trial_cost) = trial {
                    if trial_cost <= cost {
                        trace!("LM step accepted: cost {cost:e} -> {trial_cost:e}, lambda {:e}", self.lambda);
                        self.lambda = (self.lambda / LAMBDA_FACTOR).max(f64::MIN_POSITIVE);
                        return Ok((state.param(candidate).cost(trial_cost).gradient(jtr), None));
                    }
                }
            }
            self.lambda *= LAMBDA_FACTOR;
        }
        trace!("LM stalled at cost {cost:e}");
        self.stalled = true;
        Ok((state.gradient(jtr), None))
    }

    fn terminate(&mut self, state: &LmState) -> TerminationStatus {
        if self.stalled {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }
        if state.get_iter() == 0 {
            return TerminationStatus::NotTerminated;
        }
        if let (Some(tol), Some(grad)) = (self.tol_grad, state.get_gradient()) {
            if grad.iter().all(|g| g.abs() <= tol) {
                return TerminationStatus::Terminated(TerminationReason::SolverConverged);
            }
        }
        if let Some(tol) = self.tol_cost {
            let (prev, cost) = (state.get_prev_cost(), state.get_cost());
            if prev.is_finite() && (prev - cost).abs() <= tol * prev.abs().max(cost.abs()) {
                return TerminationStatus::Terminated(TerminationReason::SolverConverged);
            }
        }
        TerminationStatus::NotTerminated
    }
}
