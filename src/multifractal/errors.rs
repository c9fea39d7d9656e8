//! Errors for the multifractal extension.
use crate::{
    curve::errors::CurveError, errors::ErrorKind, estimation::errors::EstimationError,
    measure::errors::MeasureError,
};

pub type MultifractalResult<T> = Result<T, MultifractalError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MultifractalError {
    // ---- Configuration ----
    /// The q set is empty.
    EmptyQValues,
    /// A q exponent is NaN or infinite.
    NonFiniteQ { index: usize, value: f64 },

    // ---- Data ----
    /// Every box at some scale has zero mass.
    ZeroTotalMass { scale: f64 },

    // ---- Wrapped ----
    Measure(MeasureError),
    Curve(CurveError),
    Estimation(EstimationError),

    // ---- Control ----
    Cancelled,
}

impl MultifractalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MultifractalError::EmptyQValues | MultifractalError::NonFiniteQ { .. } => {
                ErrorKind::Configuration
            }
            MultifractalError::ZeroTotalMass { .. } | MultifractalError::Curve(_) => ErrorKind::Data,
            MultifractalError::Measure(err) => err.kind(),
            MultifractalError::Estimation(err) => err.kind(),
            MultifractalError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl std::error::Error for MultifractalError {}

impl std::fmt::Display for MultifractalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            MultifractalError::EmptyQValues => write!(f, "At least one q exponent is required"),
            MultifractalError::NonFiniteQ { index, value } => {
                write!(f, "Invalid q exponent at index {index}: {value}, must be finite")
            }

            // ---- Data ----
            MultifractalError::ZeroTotalMass { scale } => {
                write!(f, "Total box mass is zero at scale {scale}")
            }

            // ---- Wrapped ----
            MultifractalError::Measure(err) => write!(f, "{err}"),
            MultifractalError::Curve(err) => write!(f, "{err}"),
            MultifractalError::Estimation(err) => write!(f, "{err}"),

            // ---- Control ----
            MultifractalError::Cancelled => write!(f, "Multifractal analysis cancelled"),
        }
    }
}

impl From<MeasureError> for MultifractalError {
    fn from(err: MeasureError) -> Self {
        match err {
            MeasureError::Cancelled => MultifractalError::Cancelled,
            other => MultifractalError::Measure(other),
        }
    }
}

impl From<CurveError> for MultifractalError {
    fn from(err: CurveError) -> Self {
        MultifractalError::Curve(err)
    }
}

impl From<EstimationError> for MultifractalError {
    fn from(err: EstimationError) -> Self {
        match err {
            EstimationError::Cancelled => MultifractalError::Cancelled,
            other => MultifractalError::Estimation(other),
        }
    }
}
