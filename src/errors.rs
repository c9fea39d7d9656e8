//! errors — crate-wide error surface and failure taxonomy.
//!
//! Purpose
//! -------
//! Collect the per-subtree error enums (`SamplingError`, `MeasureError`,
//! `CurveError`, `OptError`, `EstimationError`, `ConfigError`, ...) behind a
//! single [`FractalError`] so that front-ends (batch adapters, GUI layers)
//! can propagate any failure with `?` and still classify it.
//!
//! Key behaviors
//! -------------
//! - Wrap each subtree error in a dedicated [`FractalError`] variant via
//!   `From` conversions.
//! - Classify every failure into one of four [`ErrorKind`]s:
//!   configuration, data, convergence, or cancellation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration and data failures are detected before any parallel work
//!   is dispatched; the classification does not depend on when the error
//!   surfaced.
//! - `ErrorKind::Cancelled` is a normal termination path and should not be
//!   logged as a failure by callers.
//!
//! Conventions
//! -----------
//! - Subtree modules keep returning their own error types; only the public
//!   entry points in [`crate::api`] return [`FractalResult`].
use crate::{
    config::errors::ConfigError,
    curve::errors::CurveError,
    estimation::errors::EstimationError,
    execution::ExecError,
    geometry::errors::GeometryError,
    measure::errors::MeasureError,
    multifractal::errors::MultifractalError,
    optimization::errors::OptError,
    sampling::errors::SamplingError,
};

/// Crate-wide result alias used by the public entry points.
pub type FractalResult<T> = Result<T, FractalError>;

/// ErrorKind — coarse failure taxonomy.
///
/// - `Configuration`: invalid sampling bounds, coefficients, model choices or
///   option values.
/// - `Data`: empty datasets, non-finite values in the fitting range, ranges
///   that select too few points.
/// - `Convergence`: the non-linear optimizer did not converge.
/// - `Cancelled`: cooperative cancellation was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Data,
    Convergence,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FractalError {
    Config(ConfigError),
    Execution(ExecError),
    Geometry(GeometryError),
    Sampling(SamplingError),
    Curve(CurveError),
    Measure(MeasureError),
    Optimization(OptError),
    Estimation(EstimationError),
    Multifractal(MultifractalError),
}

impl FractalError {
    /// Classify the error into the crate-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FractalError::Config(_) | FractalError::Execution(_) | FractalError::Sampling(_) => {
                ErrorKind::Configuration
            }
            FractalError::Geometry(_) | FractalError::Curve(_) => ErrorKind::Data,
            FractalError::Measure(err) => err.kind(),
            FractalError::Optimization(err) => err.kind(),
            FractalError::Estimation(err) => err.kind(),
            FractalError::Multifractal(err) => err.kind(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}

impl std::error::Error for FractalError {}

impl std::fmt::Display for FractalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FractalError::Config(err) => write!(f, "Configuration error: {err}"),
            FractalError::Execution(err) => write!(f, "Execution error: {err}"),
            FractalError::Geometry(err) => write!(f, "Geometry error: {err}"),
            FractalError::Sampling(err) => write!(f, "Sampling error: {err}"),
            FractalError::Curve(err) => write!(f, "Curve error: {err}"),
            FractalError::Measure(err) => write!(f, "Measurement error: {err}"),
            FractalError::Optimization(err) => write!(f, "Optimization error: {err}"),
            FractalError::Estimation(err) => write!(f, "Estimation error: {err}"),
            FractalError::Multifractal(err) => write!(f, "Multifractal error: {err}"),
        }
    }
}

impl From<ConfigError> for FractalError {
    fn from(err: ConfigError) -> Self {
        FractalError::Config(err)
    }
}

impl From<ExecError> for FractalError {
    fn from(err: ExecError) -> Self {
        FractalError::Execution(err)
    }
}

impl From<GeometryError> for FractalError {
    fn from(err: GeometryError) -> Self {
        FractalError::Geometry(err)
    }
}

impl From<SamplingError> for FractalError {
    fn from(err: SamplingError) -> Self {
        FractalError::Sampling(err)
    }
}

impl From<CurveError> for FractalError {
    fn from(err: CurveError) -> Self {
        FractalError::Curve(err)
    }
}

impl From<MeasureError> for FractalError {
    fn from(err: MeasureError) -> Self {
        FractalError::Measure(err)
    }
}

impl From<OptError> for FractalError {
    fn from(err: OptError) -> Self {
        FractalError::Optimization(err)
    }
}

impl From<EstimationError> for FractalError {
    fn from(err: EstimationError) -> Self {
        FractalError::Estimation(err)
    }
}

impl From<MultifractalError> for FractalError {
    fn from(err: MultifractalError) -> Self {
        FractalError::Multifractal(err)
    }
}
