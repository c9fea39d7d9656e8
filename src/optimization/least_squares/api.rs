use crate::optimization::{
    errors::OptResult,
    least_squares::{
        adapter::ArgMinAdapter,
        run::run_lm,
        traits::{FitOutcome, LmOptions, ResidualModel},
        types::Theta,
        validation::validate_theta0,
    },
};

/// Minimize the sum of squared residuals of a user model.
///
/// Runs the model's `check`, validates `theta0`, wraps the model in an
/// [`ArgMinAdapter`] and runs Levenberg–Marquardt.
///
/// Reaching the iteration cap is reported through
/// `FitOutcome::converged == false`, not as an error; callers decide how to
/// treat it.
///
/// # Errors
/// - Any error returned by `model.check(theta0, data)`.
/// - `ThetaLengthMismatch` / `InvalidThetaInput` for a bad starting point.
/// - Optimizer/runtime errors propagated from the executor.
pub fn minimize<M: ResidualModel>(
    model: &M, theta0: Theta, data: &M::Data, opts: &LmOptions,
) -> OptResult<FitOutcome> {
    model.check(&theta0, data)?;
    validate_theta0(&theta0, theta0.len())?;
    let problem = ArgMinAdapter::new(model, data);
    run_lm(theta0, opts, problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        least_squares::{
            traits::Tolerances,
            types::{JacobianMatrix, Residuals},
        },
    };
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    /// Exponential decay `y = a · exp(b · x)` with analytic Jacobian.
    struct Decay;

    impl ResidualModel for Decay {
        type Data = (Vec<f64>, Vec<f64>);

        fn observation_count(&self, data: &Self::Data) -> usize {
            data.0.len()
        }
        fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals> {
            Ok(Array1::from_iter(
                data.0.iter().zip(&data.1).map(|(x, y)| theta[0] * (theta[1] * x).exp() - y),
            ))
        }
        fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
            }
            if data.0.len() < 2 {
                return Err(OptError::InvalidModelInput { reason: "need two observations" });
            }
            Ok(())
        }
        fn jacobian(&self, theta: &Theta, data: &Self::Data) -> OptResult<JacobianMatrix> {
            let mut j = JacobianMatrix::zeros((data.0.len(), 2));
            for (i, x) in data.0.iter().enumerate() {
                let e = (theta[1] * x).exp();
                j[[i, 0]] = e;
                j[[i, 1]] = theta[0] * x * e;
            }
            Ok(j)
        }
    }

    fn decay_data() -> (Vec<f64>, Vec<f64>) {
        let xs: Vec<f64> = (0..8).map(f64::from).collect();
        let ys = xs.iter().map(|x| 3.0 * (-0.4 * x).exp()).collect();
        (xs, ys)
    }

    #[test]
    // Purpose
    // -------
    // LM recovers the parameters of an exact non-linear model.
    //
    // Given
    // -----
    // - y = 3·exp(−0.4x) on x = 0..7, start (1, 0).
    //
    // Expect
    // ------
    // - Converged, θ̂ ≈ (3, −0.4), SSE ≈ 0.
    fn minimize_recovers_exact_decay() {
        // Arrange
        let data = decay_data();

        // Act
        let out = minimize(&Decay, array![1.0, 0.0], &data, &LmOptions::default())
            .expect("fit succeeds");

        // Assert
        assert!(out.converged, "status: {}", out.status);
        assert_relative_eq!(out.theta_hat[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(out.theta_hat[1], -0.4, epsilon = 1e-6);
        assert!(out.sse < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap is reported as non-convergence.
    fn minimize_reports_iteration_cap() {
        // Arrange
        let data = decay_data();
        let opts = LmOptions::new(Tolerances::new(None, None, Some(1)).expect("valid"), 1e-3)
            .expect("valid options");

        // Act
        let out = minimize(&Decay, array![1.0, 0.0], &data, &opts).expect("runs");

        // Assert
        assert!(!out.converged);
        assert_eq!(out.status, "MaxItersReached");
    }

    /// Straight line `y = a + b · x` with no analytic Jacobian.
    struct Line;

    impl ResidualModel for Line {
        type Data = (Vec<f64>, Vec<f64>);

        fn observation_count(&self, data: &Self::Data) -> usize {
            data.0.len()
        }
        fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals> {
            Ok(Array1::from_iter(data.0.iter().zip(&data.1).map(|(x, y)| theta[0] + theta[1] * x - y)))
        }
        fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // A model without an analytic Jacobian is fitted through finite
    // differences.
    //
    // Given
    // -----
    // - y = 1.5 + 0.25x on x = 0..7, start (0, 0).
    //
    // Expect
    // ------
    // - Converged, θ̂ ≈ (1.5, 0.25).
    fn minimize_fits_model_without_jacobian() {
        // Arrange
        let xs: Vec<f64> = (0..8).map(f64::from).collect();
        let ys = xs.iter().map(|x| 1.5 + 0.25 * x).collect();

        // Act
        let out = minimize(&Line, array![0.0, 0.0], &(xs, ys), &LmOptions::default())
            .expect("fit succeeds");

        // Assert
        assert!(out.converged, "status: {}", out.status);
        assert_relative_eq!(out.theta_hat[0], 1.5, epsilon = 1e-5);
        assert_relative_eq!(out.theta_hat[1], 0.25, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // The model's check runs before any iteration.
    fn minimize_runs_model_check() {
        let data = decay_data();
        let err = minimize(&Decay, array![1.0], &data, &LmOptions::default()).unwrap_err();
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 2, actual: 1 });
    }
}
