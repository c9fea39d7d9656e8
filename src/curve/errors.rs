//! Errors for curves, ranges and the report writer.

pub type CurveResult<T> = Result<T, CurveError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CurveError {
    // ---- Construction ----
    EmptyCurve,
    LengthMismatch { scales: usize, values: usize },
    /// Scales must be finite and strictly positive.
    InvalidScale { index: usize, value: f64 },
    /// Scales must be strictly increasing.
    NonIncreasingScales { index: usize },
    /// A strategy produced values in the wrong direction.
    NonMonotone { index: usize, scale: f64, expected: &'static str },

    // ---- Range ----
    InvalidRange { low: f64, high: f64 },
    /// No curve key lies inside `[low, high]`.
    EmptyRange { low: f64, high: f64 },

    // ---- Report ----
    Io { text: String },
}

impl std::error::Error for CurveError {}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Construction ----
            CurveError::EmptyCurve => write!(f, "Curve has no points"),
            CurveError::LengthMismatch { scales, values } => {
                write!(f, "Curve length mismatch: {scales} scales, {values} values")
            }
            CurveError::InvalidScale { index, value } => {
                write!(f, "Invalid scale {value} at index {index}: must be finite and > 0")
            }
            CurveError::NonIncreasingScales { index } => {
                write!(f, "Scales are not strictly increasing at index {index}")
            }
            CurveError::NonMonotone { index, scale, expected } => {
                write!(f, "Curve is not {expected} at index {index} (scale {scale})")
            }

            // ---- Range ----
            CurveError::InvalidRange { low, high } => {
                write!(f, "Invalid range [{low}, {high}]: bounds must be finite and low <= high")
            }
            CurveError::EmptyRange { low, high } => {
                write!(f, "Range [{low}, {high}] selects no curve point")
            }

            // ---- Report ----
            CurveError::Io { text } => write!(f, "Report write failed: {text}"),
        }
    }
}

impl From<std::io::Error> for CurveError {
    fn from(err: std::io::Error) -> Self {
        CurveError::Io { text: err.to_string() }
    }
}
