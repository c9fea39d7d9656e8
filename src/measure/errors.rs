//! Errors for measurement strategies.
use crate::{
    curve::errors::CurveError, errors::ErrorKind, sampling::errors::SamplingError,
};

pub type MeasureResult<T> = Result<T, MeasureError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    // ---- Data ----
    /// Dataset has no foreground pixel / feature.
    EmptyDataset,
    /// Dataset envelope has a NaN/inf corner.
    NonFiniteEnvelope,
    /// Wrapper for curve construction / direction failures.
    Curve(CurveError),

    // ---- Configuration ----
    /// Strategy cannot run on this dataset kind.
    Unsupported { measure: &'static str, dataset: &'static str },
    /// Raster strategies need odd-multiple snapped scales.
    RequiresDiscreteSampling { measure: &'static str },
    /// Sampling resolution differs from the raster pixel size.
    ResolutionMismatch { sampling: f64, raster: f64 },
    /// Strategy parameter out of domain.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },
    /// Wrapper for sampling errors raised while resolving defaults.
    Sampling(SamplingError),
    /// Method name not recognised (batch adapter only).
    UnknownMethod { name: String },

    // ---- Control ----
    Cancelled,
}

impl MeasureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeasureError::EmptyDataset | MeasureError::NonFiniteEnvelope | MeasureError::Curve(_) => {
                ErrorKind::Data
            }
            MeasureError::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Configuration,
        }
    }
}

impl std::error::Error for MeasureError {}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Data ----
            MeasureError::EmptyDataset => write!(f, "Dataset is empty"),
            MeasureError::NonFiniteEnvelope => write!(f, "Dataset envelope is not finite"),
            MeasureError::Curve(err) => write!(f, "{err}"),

            // ---- Configuration ----
            MeasureError::Unsupported { measure, dataset } => {
                write!(f, "{measure} is not supported on {dataset} datasets")
            }
            MeasureError::RequiresDiscreteSampling { measure } => {
                write!(f, "{measure} on rasters requires discrete sampling")
            }
            MeasureError::ResolutionMismatch { sampling, raster } => {
                write!(f, "Sampling resolution {sampling} differs from raster resolution {raster}")
            }
            MeasureError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid {name} = {value}: {reason}")
            }
            MeasureError::Sampling(err) => write!(f, "{err}"),
            MeasureError::UnknownMethod { name } => write!(f, "Unknown measurement method '{name}'"),

            // ---- Control ----
            MeasureError::Cancelled => write!(f, "Measurement cancelled"),
        }
    }
}

impl From<CurveError> for MeasureError {
    fn from(err: CurveError) -> Self {
        MeasureError::Curve(err)
    }
}

impl From<SamplingError> for MeasureError {
    fn from(err: SamplingError) -> Self {
        MeasureError::Sampling(err)
    }
}
