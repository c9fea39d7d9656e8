//! Errors for curve estimation.
use crate::{
    curve::errors::CurveError, errors::ErrorKind, inference::errors::InferenceError,
    optimization::errors::OptError,
};

/// Result alias; `EstimationResult` is the fitted-result struct.
pub type EstResult<T> = Result<T, EstimationError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EstimationError {
    // ---- Data ----
    /// The range selects too few curve points.
    InsufficientPoints {
        found: usize,
        required: usize,
    },
    /// Every abscissa of a regression is identical, so no slope exists.
    DegenerateDesign {
        n: usize,
    },
    /// NaN or infinite measure inside the range.
    NonFiniteValue {
        index: usize,
        scale: f64,
        value: f64,
    },
    /// Log estimation needs strictly positive measures.
    NonPositiveValue {
        index: usize,
        scale: f64,
        value: f64,
    },
    /// Wrapper for range/curve errors.
    Curve(CurveError),

    // ---- Configuration ----
    /// Model without a scale factor chosen for a decreasing (sign −1) curve.
    ModelRequiresScale {
        model: &'static str,
    },
    /// Bootstrap configuration out of domain.
    InvalidBootstrap {
        reason: &'static str,
    },
    /// Unknown model or estimator name (batch adapter only).
    UnknownName {
        what: &'static str,
        name: String,
    },

    // ---- Convergence ----
    /// Non-linear fit stopped without converging.
    Convergence {
        status: String,
        iterations: usize,
    },
    /// Resampling kept producing fewer distinct scales than parameters.
    DegenerateResample {
        iteration: usize,
    },

    // ---- Wrapped ----
    Optimizer(OptError),
    Inference(InferenceError),

    // ---- Control ----
    Cancelled,
}

impl EstimationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EstimationError::InsufficientPoints { .. }
            | EstimationError::DegenerateDesign { .. }
            | EstimationError::NonFiniteValue { .. }
            | EstimationError::NonPositiveValue { .. }
            | EstimationError::Curve(_) => ErrorKind::Data,
            EstimationError::ModelRequiresScale { .. }
            | EstimationError::InvalidBootstrap { .. }
            | EstimationError::UnknownName { .. } => ErrorKind::Configuration,
            EstimationError::Convergence { .. } | EstimationError::DegenerateResample { .. } => {
                ErrorKind::Convergence
            }
            EstimationError::Optimizer(err) => err.kind(),
            EstimationError::Inference(err) => err.kind(),
            EstimationError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl std::error::Error for EstimationError {}

impl std::fmt::Display for EstimationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Data ----
            EstimationError::InsufficientPoints { found, required } => {
                write!(f, "Range selects {found} point(s); at least {required} are required")
            }
            EstimationError::DegenerateDesign { n } => {
                write!(f, "All {n} regression abscissae are identical; the slope is undefined")
            }
            EstimationError::NonFiniteValue { index, scale, value } => {
                write!(f, "Non-finite measure {value} at index {index} (scale {scale})")
            }
            EstimationError::NonPositiveValue { index, scale, value } => {
                write!(f, "Non-positive measure {value} at index {index} (scale {scale}) cannot be log-transformed")
            }
            EstimationError::Curve(err) => write!(f, "{err}"),

            // ---- Configuration ----
            EstimationError::ModelRequiresScale { model } => {
                write!(f, "Model {model} has no scale factor and cannot fit a decreasing curve")
            }
            EstimationError::InvalidBootstrap { reason } => {
                write!(f, "Invalid bootstrap configuration: {reason}")
            }
            EstimationError::UnknownName { what, name } => write!(f, "Unknown {what} '{name}'"),

            // ---- Convergence ----
            EstimationError::Convergence { status, iterations } => {
                write!(f, "Non-linear fit did not converge after {iterations} iteration(s): {status}")
            }
            EstimationError::DegenerateResample { iteration } => {
                write!(f, "Bootstrap iteration {iteration} could not draw enough distinct scales")
            }

            // ---- Wrapped ----
            EstimationError::Optimizer(err) => write!(f, "{err}"),
            EstimationError::Inference(err) => write!(f, "{err}"),

            // ---- Control ----
            EstimationError::Cancelled => write!(f, "Estimation cancelled"),
        }
    }
}

impl From<CurveError> for EstimationError {
    fn from(err: CurveError) -> Self {
        EstimationError::Curve(err)
    }
}

impl From<OptError> for EstimationError {
    fn from(err: OptError) -> Self {
        EstimationError::Optimizer(err)
    }
}

impl From<InferenceError> for EstimationError {
    fn from(err: InferenceError) -> Self {
        EstimationError::Inference(err)
    }
}
