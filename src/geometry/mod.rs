//! geometry — dataset handles consumed by the measurement strategies.
//!
//! Purpose
//! -------
//! Model the two kinds of spatial input the engine measures: binary rasters
//! (georeferenced occupancy grids) and vector feature collections (points,
//! polylines, polygons) behind the [`FeatureSet`] trait. The GIS layer that
//! reads shapefiles or images lives outside the crate and hands in one of
//! these through [`Dataset`].
//!
//! Key behaviors
//! -------------
//! - [`Envelope`] is a closed axis-aligned rectangle; all intersection tests
//!   are closed, so features touching a cell edge occupy that cell.
//! - [`EnvelopeIndex`] is a uniform bucket grid used for envelope lookups in
//!   cell-driven box counting and in pairwise distance counting.
//! - [`SummedAreaTable`] answers square-window foreground counts in O(1).
//!
//! Invariants & assumptions
//! ------------------------
//! - Coordinates are finite; constructors reject NaN/inf.
//! - Raster pixel `(col, row)` covers `[x0 + col*res, x0 + (col+1)*res]`
//!   horizontally and grows with `y` vertically.

pub mod dataset;
pub mod envelope;
pub mod errors;
pub mod index;
pub mod raster;
pub mod vector;

pub use self::{
    dataset::Dataset,
    envelope::Envelope,
    errors::{GeometryError, GeometryResult},
    index::EnvelopeIndex,
    raster::{BinaryRaster, SummedAreaTable},
    vector::{BufferOracle, FeatureSet, PointSet, PolygonSet, PolylineSet},
};
