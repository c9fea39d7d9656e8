use crate::optimization::{
    errors::OptResult,
    least_squares::{
        adapter::ArgMinAdapter,
        solver::LevenbergMarquardt,
        traits::{FitOutcome, LmOptions, ResidualModel},
        types::Theta,
    },
};
use argmin::core::{Executor, State};
use log::debug;

/// Run the Levenberg–Marquardt solver on an adapted residual problem.
///
/// Wires up the adapter, the solver built from `opts`, the initial
/// parameter `theta0` and the optional `max_iters`, executes, and converts
/// the final state into a [`FitOutcome`].
///
/// # Errors
/// - Propagates model errors raised during the initial evaluation and
///   argmin runtime errors via `From<argmin::core::Error>`.
/// - Propagates validation errors encountered when constructing the
///   outcome.
pub fn run_lm<M: ResidualModel>(
    theta0: Theta, opts: &LmOptions, problem: ArgMinAdapter<'_, M>,
) -> OptResult<FitOutcome> {
    let solver = LevenbergMarquardt::new(opts);
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    debug!(
        "least squares finished after {iterations} iteration(s): {termination:?}, sse = {:e}",
        result.get_best_cost()
    );
    FitOutcome::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}
