//! Validation helpers for least-squares optimization.
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`],
//!   [`verify_lambda`].
//! - **Model output**: [`validate_residuals`], [`validate_jacobian`].
//! - **Parameters**: [`validate_theta0`], [`validate_theta_hat`].
//! - **Objective values**: [`validate_value`].
//!
//! Each helper reports the first offending entry through a specific
//! [`OptError`] variant.
use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::types::{JacobianMatrix, Residuals, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional relative cost-change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the starting damping parameter.
///
/// # Errors
/// Returns [`OptError::InvalidLambda`] if `lambda` is non-finite or ≤ 0.0.
pub fn verify_lambda(lambda: f64) -> OptResult<()> {
    if !lambda.is_finite() {
        return Err(OptError::InvalidLambda { lambda, reason: "Damping must be finite." });
    }
    if lambda <= 0.0 {
        return Err(OptError::InvalidLambda { lambda, reason: "Damping must be positive." });
    }
    Ok(())
}

/// Validate a residual vector against length and finiteness.
pub fn validate_residuals(residuals: &Residuals, len: usize) -> OptResult<()> {
    if residuals.len() != len {
        return Err(OptError::ResidualLengthMismatch { expected: len, found: residuals.len() });
    }
    for (index, &value) in residuals.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidResidual { index, value });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a residual Jacobian.
///
/// # Errors
/// - [`OptError::JacobianDimMismatch`] if the shape is not `rows × cols`.
/// - [`OptError::InvalidJacobian`] for the first non-finite entry.
pub fn validate_jacobian(jacobian: &JacobianMatrix, rows: usize, cols: usize) -> OptResult<()> {
    if jacobian.nrows() != rows || jacobian.ncols() != cols {
        return Err(OptError::JacobianDimMismatch {
            expected: (rows, cols),
            found: (jacobian.nrows(), jacobian.ncols()),
        });
    }
    for ((row, col), &value) in jacobian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidJacobian { row, col, value });
        }
    }
    Ok(())
}

/// Validate a starting parameter vector before any evaluation.
pub fn validate_theta0(theta0: &Theta, dim: usize) -> OptResult<()> {
    if theta0.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta0.len() });
    }
    for (index, &value) in theta0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar cost is finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    // Purpose
    // -------
    // Tolerances and damping reject zero, negative and non-finite values.
    fn tolerance_checks_reject_bad_values() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-8)).is_ok());
        assert!(verify_tol_grad(Some(0.0)).is_err());
        assert!(verify_tol_cost(Some(f64::NAN)).is_err());
        assert!(verify_lambda(1e-3).is_ok());
        assert!(verify_lambda(-1.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Residual and Jacobian checks report shape first, then the first
    // non-finite entry.
    //
    // Given
    // -----
    // - A 3-vector of residuals with NaN at index 1.
    // - A 2×2 Jacobian checked against a 3×2 shape.
    //
    // Expect
    // ------
    // - `InvalidResidual { index: 1 }` and `JacobianDimMismatch`.
    fn model_output_checks() {
        // Arrange
        let r = array![0.0, f64::NAN, 1.0];
        let j = Array2::<f64>::zeros((2, 2));

        // Act
        let r_err = validate_residuals(&r, 3).unwrap_err();
        let j_err = validate_jacobian(&j, 3, 2).unwrap_err();

        // Assert
        assert!(matches!(r_err, OptError::InvalidResidual { index: 1, .. }));
        assert_eq!(j_err, OptError::JacobianDimMismatch { expected: (3, 2), found: (2, 2) });
    }

    #[test]
    // Purpose
    // -------
    // Starting parameters must match the model dimension and be finite.
    fn theta0_checks() {
        assert!(validate_theta0(&array![1.0, 2.0], 2).is_ok());
        assert_eq!(
            validate_theta0(&array![1.0], 2).unwrap_err(),
            OptError::ThetaLengthMismatch { expected: 2, actual: 1 }
        );
        assert!(validate_theta0(&array![1.0, f64::INFINITY], 2).is_err());
        assert_eq!(validate_theta_hat(None).unwrap_err(), OptError::MissingThetaHat);
    }
}
