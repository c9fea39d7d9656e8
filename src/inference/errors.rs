//! Unified error handling for inference routines.
//!
//! `InferenceError` covers degrees-of-freedom problems, invalid confidence
//! levels, degenerate samples and distribution-construction failures. An
//! alias `InferenceResult<T>` standardizes the return type across inference
//! code.
use crate::errors::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Degrees of freedom ----
    /// Fewer observations than needed for a residual variance.
    InsufficientDegreesOfFreedom {
        observations: usize,
        parameters: usize,
    },

    // ---- Intervals ----
    /// Confidence level must lie strictly between 0 and 1.
    InvalidConfidenceLevel {
        level: f64,
    },
    /// Percentile must lie in [0, 1].
    InvalidProbability {
        p: f64,
    },
    /// Percentiles of an empty sample.
    EmptySample,
    /// Sample entries need to be finite.
    NonFiniteSample {
        index: usize,
        value: f64,
    },

    // ---- Shapes ----
    /// Jacobian has no columns or no rows.
    EmptyJacobian,

    // ---- statrs ----
    /// Wrapper for statrs distribution construction errors.
    Distribution {
        text: String,
    },
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl InferenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InferenceError::InvalidConfidenceLevel { .. } | InferenceError::InvalidProbability { .. } => {
                ErrorKind::Configuration
            }
            _ => ErrorKind::Data,
        }
    }
}

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Degrees of freedom ----
            InferenceError::InsufficientDegreesOfFreedom { observations, parameters } => write!(
                f,
                "Inference Error: {observations} observation(s) leave no degrees of freedom for {parameters} parameter(s)"
            ),

            // ---- Intervals ----
            InferenceError::InvalidConfidenceLevel { level } => {
                write!(f, "Inference Error: Confidence level {level} must lie in (0, 1)")
            }
            InferenceError::InvalidProbability { p } => {
                write!(f, "Inference Error: Probability {p} must lie in [0, 1]")
            }
            InferenceError::EmptySample => write!(f, "Inference Error: Sample is empty"),
            InferenceError::NonFiniteSample { index, value } => {
                write!(f, "Inference Error: Sample value {value} at index {index} is not finite")
            }

            // ---- Shapes ----
            InferenceError::EmptyJacobian => write!(f, "Inference Error: Jacobian is empty"),

            // ---- statrs ----
            InferenceError::Distribution { text } => write!(f, "Inference Error: {text}"),
        }
    }
}
