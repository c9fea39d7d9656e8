//! Errors raised while constructing geometry inputs.

pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    // ---- Raster ----
    /// Pixel buffer length does not match `width * height`.
    BufferLengthMismatch { expected: usize, found: usize },
    /// Raster resolution must be finite and strictly positive.
    InvalidResolution { value: f64 },
    /// Raster origin must be finite.
    InvalidOrigin { x: f64, y: f64 },

    // ---- Vector ----
    /// Coordinate is NaN or infinite.
    NonFiniteCoordinate { feature: usize, x: f64, y: f64 },
    /// Point mass must be finite and non-negative.
    InvalidMass { feature: usize, value: f64 },
    /// Number of masses differs from number of points.
    MassLengthMismatch { expected: usize, found: usize },
    /// Polylines need at least one vertex, polygons at least three.
    DegenerateFeature { feature: usize, vertices: usize },
}

impl std::error::Error for GeometryError {}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Raster ----
            GeometryError::BufferLengthMismatch { expected, found } => {
                write!(f, "Pixel buffer length mismatch: expected {expected}, found {found}")
            }
            GeometryError::InvalidResolution { value } => {
                write!(f, "Invalid raster resolution {value}: must be finite and > 0")
            }
            GeometryError::InvalidOrigin { x, y } => {
                write!(f, "Invalid raster origin ({x}, {y}): must be finite")
            }

            // ---- Vector ----
            GeometryError::NonFiniteCoordinate { feature, x, y } => {
                write!(f, "Feature {feature} has a non-finite coordinate ({x}, {y})")
            }
            GeometryError::InvalidMass { feature, value } => {
                write!(f, "Feature {feature} has invalid mass {value}: must be finite and >= 0")
            }
            GeometryError::MassLengthMismatch { expected, found } => {
                write!(f, "Mass vector length mismatch: expected {expected}, found {found}")
            }
            GeometryError::DegenerateFeature { feature, vertices } => {
                write!(f, "Feature {feature} is degenerate: only {vertices} vertices")
            }
        }
    }
}
