//! Opaque dataset handle passed to measurement strategies.
use super::{envelope::Envelope, raster::BinaryRaster, vector::FeatureSet};

/// Fallback resolution for vector layers without a native one, as a
/// fraction of the larger envelope dimension.
pub const VECTOR_RESOLUTION_FRACTION: f64 = 1e-3;

/// Dataset — raster pixel accessor or vector feature collection.
///
/// Notes
/// -----
/// - The raster envelope is the tight extent of its foreground pixels, so
///   empty margins around the data do not change box counts.
#[derive(Clone, Copy)]
pub enum Dataset<'a> {
    Raster(&'a BinaryRaster),
    Vector(&'a dyn FeatureSet),
}

impl std::fmt::Debug for Dataset<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Raster(r) => {
                write!(f, "Dataset::Raster({}x{}, res={})", r.width(), r.height(), r.resolution())
            }
            Dataset::Vector(v) => write!(f, "Dataset::Vector({} features)", v.len()),
        }
    }
}

impl<'a> Dataset<'a> {
    pub fn envelope(&self) -> Option<Envelope> {
        match self {
            Dataset::Raster(r) => r.foreground_envelope(),
            Dataset::Vector(v) => v.envelope(),
        }
    }

    /// Pixel size for rasters; native or envelope-derived size for vectors.
    pub fn resolution(&self) -> Option<f64> {
        match self {
            Dataset::Raster(r) => Some(r.resolution()),
            Dataset::Vector(v) => v.resolution().or_else(|| {
                let env = v.envelope()?;
                let extent = env.max_dimension();
                (extent > 0.0).then_some(extent * VECTOR_RESOLUTION_FRACTION)
            }),
        }
    }

    /// Foreground pixels for rasters, features for vectors.
    pub fn feature_count(&self) -> usize {
        match self {
            Dataset::Raster(r) => r.foreground_count(),
            Dataset::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.feature_count() == 0
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::Raster(_) => "raster",
            Dataset::Vector(_) => "vector",
        }
    }
}
