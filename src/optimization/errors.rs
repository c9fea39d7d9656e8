use argmin::core::{ArgminError, Error};

use crate::errors::ErrorKind;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Jacobian ----
    /// Implies that FD should be used
    JacobianNotImplemented,

    /// Jacobian shape does not match (residuals, parameters).
    JacobianDimMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Jacobian entries need to be finite.
    InvalidJacobian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Residuals ----
    /// Residual vector length does not match the number of observations.
    ResidualLengthMismatch {
        expected: usize,
        found: usize,
    },

    /// Residual entries need to be finite.
    InvalidResidual {
        index: usize,
        value: f64,
    },

    // ---- LmOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Damping parameter needs to be positive and finite.
    InvalidLambda {
        lambda: f64,
        reason: &'static str,
    },

    // ---- Model input ----
    /// Parameter vector length does not match the model.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Starting parameters must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    /// Observations rejected by the model's check.
    InvalidModelInput {
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl OptError {
    /// Taxonomy bucket for this error.
    ///
    /// Option and model-shape problems are configuration errors; numerical
    /// breakdowns while iterating are convergence errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OptError::JacobianNotImplemented
            | OptError::JacobianDimMismatch { .. }
            | OptError::ResidualLengthMismatch { .. }
            | OptError::InvalidTolGrad { .. }
            | OptError::InvalidTolCost { .. }
            | OptError::InvalidMaxIter { .. }
            | OptError::NoTolerancesProvided
            | OptError::InvalidLambda { .. }
            | OptError::ThetaLengthMismatch { .. }
            | OptError::InvalidParameter { .. }
            | OptError::NotImplemented { .. } => ErrorKind::Configuration,
            OptError::InvalidThetaInput { .. } | OptError::InvalidModelInput { .. } => {
                ErrorKind::Data
            }
            _ => ErrorKind::Convergence,
        }
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Jacobian ----
            OptError::JacobianNotImplemented => {
                write!(f, "Analytic Jacobian not implemented")
            }
            OptError::JacobianDimMismatch { expected, found } => {
                write!(f, "Jacobian dimension mismatch: expected {expected:?}, found {found:?}")
            }
            OptError::InvalidJacobian { row, col, value } => {
                write!(f, "Invalid Jacobian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Residuals ----
            OptError::ResidualLengthMismatch { expected, found } => {
                write!(f, "Residual length mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidResidual { index, value } => {
                write!(f, "Invalid residual at index {index}: {value}, must be finite")
            }

            // ---- LmOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLambda { lambda, reason } => {
                write!(f, "Invalid damping parameter {lambda}: {reason}")
            }

            // ---- Model input ----
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::InvalidModelInput { reason } => {
                write!(f, "Invalid model input: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    /// Recover our own error if a model or adapter raised it inside the
    /// executor, otherwise map argmin's error variants.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // An `OptError` that travelled through argmin's `Error` comes back out
    // unchanged instead of being flattened to a backend string.
    fn from_argmin_error_recovers_opt_error() {
        // Arrange
        let original = OptError::NonFiniteCost { value: f64::INFINITY };
        let wrapped: Error = original.clone().into();

        // Act
        let recovered = OptError::from(wrapped);

        // Assert
        assert_eq!(recovered, original);
        assert_eq!(recovered.kind(), ErrorKind::Convergence);
    }

    #[test]
    // Purpose
    // -------
    // Argmin's own variants keep their message text.
    fn from_argmin_error_maps_variants() {
        // Arrange
        let wrapped: Error = ArgminError::NotInitialized { text: "param".to_string() }.into();

        // Act
        let mapped = OptError::from(wrapped);

        // Assert
        assert_eq!(mapped, OptError::NotInitialized { text: "param".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Option errors are configuration problems.
    fn option_errors_are_configuration() {
        let err = OptError::InvalidLambda { lambda: -1.0, reason: "must be positive" };
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
