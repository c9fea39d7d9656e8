//! Errors for scale sampling. Every variant is a configuration error and is
//! raised before any measurement work starts.

pub type SamplingResult<T> = Result<T, SamplingError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    // ---- Bounds ----
    /// Minimum scale must be finite and strictly positive.
    InvalidMinSize { value: f64 },
    /// Maximum scale must be finite and strictly positive.
    InvalidMaxSize { value: f64 },
    /// Minimum exceeds maximum after defaults were resolved.
    MinExceedsMax { min: f64, max: f64 },
    /// A zero bound needs a dataset to resolve it from.
    UnresolvedDefault { bound: &'static str },

    // ---- Progression ----
    /// Geometric sequences need `coef > 1`, arithmetic ones `coef > 0`.
    InvalidCoefficient { coef: f64, reason: &'static str },
    /// Discrete snapping needs a finite, strictly positive resolution.
    InvalidResolution { value: f64 },
    /// No scale survived generation and snapping.
    EmptySequence { min: f64, max: f64 },
    /// Sequence would exceed the hard cap on scale count.
    TooManyScales { limit: usize },

    // ---- Parsing (batch adapter only) ----
    UnknownSequence { name: String },
}

impl std::error::Error for SamplingError {}

impl std::fmt::Display for SamplingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Bounds ----
            SamplingError::InvalidMinSize { value } => {
                write!(f, "Invalid minimum scale {value}: must be finite and > 0")
            }
            SamplingError::InvalidMaxSize { value } => {
                write!(f, "Invalid maximum scale {value}: must be finite and > 0")
            }
            SamplingError::MinExceedsMax { min, max } => {
                write!(f, "Minimum scale {min} exceeds maximum scale {max}")
            }
            SamplingError::UnresolvedDefault { bound } => {
                write!(f, "Default {bound} scale cannot be resolved without a dataset envelope")
            }

            // ---- Progression ----
            SamplingError::InvalidCoefficient { coef, reason } => {
                write!(f, "Invalid sampling coefficient {coef}: {reason}")
            }
            SamplingError::InvalidResolution { value } => {
                write!(f, "Invalid resolution {value}: must be finite and > 0")
            }
            SamplingError::EmptySequence { min, max } => {
                write!(f, "No scale generated in [{min}, {max}]")
            }
            SamplingError::TooManyScales { limit } => {
                write!(f, "Scale sequence exceeds {limit} values")
            }

            // ---- Parsing ----
            SamplingError::UnknownSequence { name } => {
                write!(f, "Unknown sequence kind '{name}': expected 'geom' or 'arith'")
            }
        }
    }
}
