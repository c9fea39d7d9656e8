//! Bridge from a [`ResidualModel`] to argmin's problem traits.
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    least_squares::{
        traits::ResidualModel,
        types::{Cost, JacobianMatrix, Residuals, Theta},
        validation::{validate_jacobian, validate_residuals},
    },
};
use argmin::core::{CostFunction, Error, Jacobian, Operator};
use finitediff::FiniteDiff;

/// Bridges a user `ResidualModel` to `argmin`'s `Operator`, `Jacobian` and
/// `CostFunction`.
///
/// - `Operator::apply` returns the validated residual vector `r(θ)`.
/// - `Jacobian::jacobian` returns the analytic `∂r/∂θ` when the model has
///   one, otherwise a finite-difference approximation.
/// - `CostFunction::cost` returns `r·r`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, M: ResidualModel> {
    pub model: &'a M,
    pub data: &'a M::Data,
    observations: usize,
}

impl<'a, M: ResidualModel> ArgMinAdapter<'a, M> {
    /// Construct a new adapter over a user model and its data.
    pub fn new(model: &'a M, data: &'a M::Data) -> Self {
        let observations = model.observation_count(data);
        Self { model, data, observations }
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Finite-difference Jacobian, one residual component at a time.
    ///
    /// This is the path for caller-supplied [`ResidualModel`]s that return
    /// [`OptError::JacobianNotImplemented`]; the built-in power-law
    /// residuals always take the analytic branch.
    ///
    /// Errors raised by the model inside the difference closure are
    /// captured in `closure_err` (the closure must return `f64`) and
    /// surfaced after the sweep.
    fn fd_jacobian(&self, theta: &Theta, forward: bool) -> Result<JacobianMatrix, Error> {
        let dim = theta.len();
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let mut jacobian = JacobianMatrix::zeros((self.observations, dim));
        for i in 0..self.observations {
            let component = |t: &Theta| -> f64 {
                match self.apply(t) {
                    Ok(r) => r[i],
                    Err(e) => {
                        let mut slot = closure_err.borrow_mut();
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                        f64::NAN
                    }
                }
            };
            let row = if forward { theta.forward_diff(&component) } else { theta.central_diff(&component) };
            jacobian.row_mut(i).assign(&row);
        }
        if let Some(err) = closure_err.take() {
            return Err(err);
        }
        validate_jacobian(&jacobian, self.observations, dim)?;
        Ok(jacobian)
    }
}

impl<M: ResidualModel> Operator for ArgMinAdapter<'_, M> {
    type Param = Theta;
    type Output = Residuals;

    /// Evaluate `r(θ)` and check its length and finiteness.
    fn apply(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let residuals = self.model.residuals(theta, self.data)?;
        validate_residuals(&residuals, self.observations)?;
        Ok(residuals)
    }
}

impl<M: ResidualModel> Jacobian for ArgMinAdapter<'_, M> {
    type Param = Theta;
    type Jacobian = JacobianMatrix;

    /// Evaluate `∂r/∂θ` at `θ`.
    ///
    /// Behavior:
    /// - If the model implements `jacobian`, validate its shape and entries.
    /// - Otherwise try central differences; if any evaluation failed or the
    ///   result is not finite (e.g. a step crossed a domain boundary), retry
    ///   once with forward differences.
    fn jacobian(&self, theta: &Self::Param) -> Result<Self::Jacobian, Error> {
        match self.model.jacobian(theta, self.data) {
            Ok(j) => {
                validate_jacobian(&j, self.observations, theta.len())?;
                Ok(j)
            }
            Err(OptError::JacobianNotImplemented) => {
                self.fd_jacobian(theta, false).or_else(|_| self.fd_jacobian(theta, true))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<M: ResidualModel> CostFunction for ArgMinAdapter<'_, M> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = r·r`.
    ///
    /// # Errors
    /// Propagates model errors and returns `NonFiniteCost` on overflow.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let residuals = self.apply(theta)?;
        Ok(sum_of_squares(&residuals)?)
    }
}

/// `r·r`, rejecting overflow.
pub fn sum_of_squares(residuals: &Residuals) -> OptResult<Cost> {
    let value = residuals.dot(residuals);
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    /// `r_i = θ0 · x_i + θ1 − y_i` without an analytic Jacobian.
    struct Line;

    impl ResidualModel for Line {
        type Data = (Vec<f64>, Vec<f64>);

        fn observation_count(&self, data: &Self::Data) -> usize {
            data.0.len()
        }
        fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals> {
            Ok(Array1::from_iter(data.0.iter().zip(&data.1).map(|(x, y)| theta[0] * x + theta[1] - y)))
        }
        fn check(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic Jacobian the adapter differentiates each residual
    // numerically.
    //
    // Given
    // -----
    // - Linear residuals over x = [0, 1, 2].
    //
    // Expect
    // ------
    // - Jacobian rows `[x_i, 1]` to finite-difference accuracy.
    fn fd_jacobian_matches_linear_model() {
        // Arrange
        let data = (vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 5.0]);
        let adapter = ArgMinAdapter::new(&Line, &data);
        let theta = array![2.0, 1.0];

        // Act
        let jac = adapter.jacobian(&theta).expect("fd jacobian");
        let cost = adapter.cost(&theta).expect("finite cost");

        // Assert
        assert_eq!(jac.dim(), (3, 2));
        for (i, x) in data.0.iter().enumerate() {
            assert_relative_eq!(jac[[i, 0]], *x, epsilon = 1e-6);
            assert_relative_eq!(jac[[i, 1]], 1.0, epsilon = 1e-6);
        }
        assert_relative_eq!(cost, 0.0);
    }
}
