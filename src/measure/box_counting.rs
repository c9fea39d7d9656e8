//! Gliding-grid box counting.
//!
//! For every probe scale `s`, count the cells of a covering grid of side `s`
//! that intersect the dataset, optionally over several diagonal offsets,
//! and keep the minimum count.
//!
//! Each grid tile is counted in one of two modes, chosen per tile:
//! - cell-driven when the tile has fewer cells than the dataset has
//!   features: iterate cells (parallel over rows), look features up by
//!   cell envelope;
//! - feature-driven otherwise: iterate features (parallel over batches),
//!   mark the cells their envelope spans after an exact intersection test.
//!
//! Both modes evaluate the same predicate: cell `(c, r)` is occupied iff
//! some feature has `(c, r)` inside its clamped cell span and intersects
//! the cell envelope. Raster foreground pixels are point features at pixel
//! centres.
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    checked_envelope,
    errors::{MeasureError, MeasureResult},
    grid::{BoxGrid, GridTile, TileMask},
};
use crate::{
    curve::{Curve, Monotonicity, Sign},
    execution::ExecContext,
    geometry::{BinaryRaster, Dataset, EnvelopeIndex, FeatureSet, SummedAreaTable},
    sampling::Sampling,
};

/// Growth ratio of the gliding offset count across scale indices.
pub const GLIDING_RATIO: f64 = 1.2;
/// Features per parallel batch in feature-driven mode.
pub const FEATURE_BATCH: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxCountingOptions {
    /// Gliding factor `d`; `d <= 1` disables gliding.
    pub gliding: f64,
}

impl BoxCountingOptions {
    pub fn with_gliding(gliding: f64) -> Self {
        Self { gliding }
    }
}

/// Number of grid offsets tried at scale index `scale_index`:
/// `max(1, round(d * 1.2^i))` for `d > 1`, else 1.
pub fn offset_count(gliding: f64, scale_index: usize) -> usize {
    if gliding <= 1.0 {
        return 1;
    }
    let n = (gliding * GLIDING_RATIO.powi(scale_index as i32)).round();
    if n < 1.0 { 1 } else { n as usize }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountingMode {
    CellDriven,
    FeatureDriven,
}

impl CountingMode {
    pub fn select(cells: u64, features: usize) -> Self {
        if cells < features as u64 { CountingMode::CellDriven } else { CountingMode::FeatureDriven }
    }
}

/// Dataset prepared once for all grids of a run.
enum Occupants<'a> {
    Raster { raster: &'a BinaryRaster, sat: SummedAreaTable, pixels: Vec<(u32, u32)> },
    Vector { set: &'a dyn FeatureSet, index: EnvelopeIndex },
}

impl<'a> Occupants<'a> {
    fn prepare(dataset: Dataset<'a>) -> Self {
        match dataset {
            Dataset::Raster(raster) => Occupants::Raster {
                raster,
                sat: raster.summed_area_table(),
                pixels: raster.foreground_pixels(),
            },
            Dataset::Vector(set) => Occupants::Vector { set, index: EnvelopeIndex::build(set) },
        }
    }

    fn feature_count(&self) -> usize {
        match self {
            Occupants::Raster { pixels, .. } => pixels.len(),
            Occupants::Vector { set, .. } => set.len(),
        }
    }

    /// Occupied cells of `grid`, summed over its tiles.
    fn count(
        &self, grid: &BoxGrid, ctx: &ExecContext, forced: Option<CountingMode>,
    ) -> MeasureResult<u64> {
        let features = self.feature_count();
        match self {
            Occupants::Raster { raster, sat, pixels } => {
                let map = PixelMap::new(raster, grid);
                sum_tiles(grid, features, forced, |tile, mode| match mode {
                    CountingMode::CellDriven => raster_cells(sat, &map, tile, ctx),
                    CountingMode::FeatureDriven => raster_features(pixels, &map, tile, ctx),
                })
            }
            Occupants::Vector { set, index } => {
                sum_tiles(grid, features, forced, |tile, mode| match mode {
                    CountingMode::CellDriven => vector_cells(*set, index, grid, tile, ctx),
                    CountingMode::FeatureDriven => vector_features(*set, grid, tile, ctx),
                })
            }
        }
    }
}

/// Sum per-tile counts; the mode is re-selected for every tile unless
/// `forced`. A `None` tile count means the run was cancelled.
fn sum_tiles(
    grid: &BoxGrid, features: usize, forced: Option<CountingMode>,
    mut count_tile: impl FnMut(&GridTile, CountingMode) -> Option<u64>,
) -> MeasureResult<u64> {
    let mut total = 0u64;
    for tile in grid.tiles() {
        let mode = forced.unwrap_or_else(|| CountingMode::select(tile.cell_count(), features));
        total += count_tile(&tile, mode).ok_or(MeasureError::Cancelled)?;
    }
    Ok(total)
}

/// Cell index of every raster pixel centre for one grid.
struct PixelMap {
    col_of: Vec<usize>,
    row_of: Vec<usize>,
}

impl PixelMap {
    fn new(raster: &BinaryRaster, grid: &BoxGrid) -> Self {
        let col_of = (0..raster.width()).map(|c| grid.column_of(raster.pixel_center(c, 0).0)).collect();
        let row_of = (0..raster.height()).map(|r| grid.row_of(raster.pixel_center(0, r).1)).collect();
        Self { col_of, row_of }
    }

    /// Half-open pixel range mapped onto cells `[first, last]`.
    fn pixel_range(map: &[usize], first: usize, last: usize) -> (usize, usize) {
        (map.partition_point(|&c| c < first), map.partition_point(|&c| c <= last))
    }
}

fn raster_cells(
    sat: &SummedAreaTable, map: &PixelMap, tile: &GridTile, ctx: &ExecContext,
) -> Option<u64> {
    ctx.install(|| {
        (tile.row0..tile.row1)
            .into_par_iter()
            .map(|row| {
                if ctx.is_cancelled() {
                    return None;
                }
                let (pr0, pr1) = PixelMap::pixel_range(&map.row_of, row, row);
                if pr0 >= pr1 {
                    return Some(0);
                }
                let occupied = (tile.col0..tile.col1)
                    .filter(|&col| {
                        let (pc0, pc1) = PixelMap::pixel_range(&map.col_of, col, col);
                        sat.rect_count(pc0, pr0, pc1, pr1) > 0
                    })
                    .count();
                Some(occupied as u64)
            })
            .sum::<Option<u64>>()
    })
}

fn raster_features(
    pixels: &[(u32, u32)], map: &PixelMap, tile: &GridTile, ctx: &ExecContext,
) -> Option<u64> {
    let mask = ctx.install(|| {
        pixels
            .par_chunks(FEATURE_BATCH)
            .try_fold(
                || TileMask::new(*tile),
                |mut mask, batch| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    for &(pc, pr) in batch {
                        let cell = (map.col_of[pc as usize], map.row_of[pr as usize]);
                        if let Some((c, r, _, _)) = tile.clip((cell.0, cell.1, cell.0, cell.1)) {
                            mask.set(c, r);
                        }
                    }
                    Some(mask)
                },
            )
            .try_reduce(|| TileMask::new(*tile), |a, b| Some(a.union(b)))
    })?;
    Some(mask.count())
}

fn vector_cells(
    set: &dyn FeatureSet, index: &EnvelopeIndex, grid: &BoxGrid, tile: &GridTile, ctx: &ExecContext,
) -> Option<u64> {
    ctx.install(|| {
        (tile.row0..tile.row1)
            .into_par_iter()
            .map(|row| {
                if ctx.is_cancelled() {
                    return None;
                }
                let mut candidates = Vec::new();
                let mut occupied = 0u64;
                for col in tile.col0..tile.col1 {
                    let cell = grid.cell_envelope(col, row);
                    index.query_into(&cell, &mut candidates);
                    let hit = candidates.iter().any(|&f| {
                        let (c0, r0, c1, r1) = grid.cell_span(index.envelope_of(f));
                        (c0..=c1).contains(&col)
                            && (r0..=r1).contains(&row)
                            && set.intersects_box(f, &cell)
                    });
                    occupied += u64::from(hit);
                }
                Some(occupied)
            })
            .sum::<Option<u64>>()
    })
}

fn vector_features(
    set: &dyn FeatureSet, grid: &BoxGrid, tile: &GridTile, ctx: &ExecContext,
) -> Option<u64> {
    let n = set.len();
    let batches = n.div_ceil(FEATURE_BATCH);
    let mask = ctx.install(|| {
        (0..batches)
            .into_par_iter()
            .try_fold(
                || TileMask::new(*tile),
                |mut mask, batch| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    let start = batch * FEATURE_BATCH;
                    for f in start..(start + FEATURE_BATCH).min(n) {
                        let span = grid.cell_span(&set.feature_envelope(f));
                        let Some((c0, r0, c1, r1)) = tile.clip(span) else {
                            continue;
                        };
                        for row in r0..=r1 {
                            for col in c0..=c1 {
                                if set.intersects_box(f, &grid.cell_envelope(col, row)) {
                                    mask.set(col, row);
                                }
                            }
                        }
                    }
                    Some(mask)
                },
            )
            .try_reduce(|| TileMask::new(*tile), |a, b| Some(a.union(b)))
    })?;
    Some(mask.count())
}

/// Box counting curve of `dataset` over `sampling`.
///
/// Parameters
/// ----------
/// - `dataset`: raster or vector dataset, must not be empty.
/// - `sampling`: probe box sides, usually continuous.
/// - `options`: gliding factor.
/// - `ctx`: worker pool and cancel flag.
///
/// Returns
/// -------
/// `Curve` with one minimal count per scale and sign `Negative`.
///
/// Errors
/// ------
/// - `EmptyDataset` / `NonFiniteEnvelope` before any work starts.
/// - `InvalidParameter` for a negative or non-finite gliding factor.
/// - `Cancelled` when the flag is raised; partial counts are discarded.
///
/// Notes
/// -----
/// - Counts shrink with the scale; a violation (possible with non-nested
///   grids or gliding) is logged, not rejected.
pub fn box_counting(
    dataset: Dataset<'_>, sampling: &Sampling, options: &BoxCountingOptions, ctx: &ExecContext,
) -> MeasureResult<Curve> {
    box_counting_with_mode(dataset, sampling, options, ctx, None)
}

/// Box counting with the counting mode pinned for every tile.
///
/// Used to check that both modes agree; production callers use
/// [`box_counting`], which selects the mode per tile.
pub fn box_counting_with_mode(
    dataset: Dataset<'_>, sampling: &Sampling, options: &BoxCountingOptions, ctx: &ExecContext,
    mode: Option<CountingMode>,
) -> MeasureResult<Curve> {
    let envelope = checked_envelope(&dataset)?;
    if !options.gliding.is_finite() || options.gliding < 0.0 {
        return Err(MeasureError::InvalidParameter {
            name: "gliding",
            value: options.gliding,
            reason: "must be finite and >= 0",
        });
    }

    let occupants = Occupants::prepare(dataset);
    let mut counts = Vec::with_capacity(sampling.len());
    for (i, &size) in sampling.values().iter().enumerate() {
        if ctx.is_cancelled() {
            return Err(MeasureError::Cancelled);
        }
        let offsets = offset_count(options.gliding, i);
        let mut best = u64::MAX;
        for j in 0..offsets {
            let offset = j as f64 * size / offsets as f64;
            let grid = BoxGrid::covering(&envelope, size, offset);
            best = best.min(occupants.count(&grid, ctx, mode)?);
        }
        debug!("box counting: scale {size}, {offsets} offset(s), count {best}");
        counts.push(best as f64);
    }

    let curve = Curve::new(sampling.values().to_vec(), counts, Sign::Negative)?;
    if let Err(err) = curve.check_monotone(Monotonicity::NonIncreasing) {
        warn!("box counting: {err}");
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        execution::CancelFlag,
        geometry::{PointSet, PolylineSet},
        sampling::Sequence,
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Exact counts on simple shapes, agreement of the two counting modes,
    // gliding offsets and cancellation. Pipeline-level checks live in
    // tests/integration_box_counting_pipeline.rs.
    // -------------------------------------------------------------------------

    fn ctx() -> ExecContext {
        ExecContext::new(2).expect("pool should build")
    }

    fn doubling(max: f64) -> Sampling {
        Sampling::new(1.0, max, 2.0, Sequence::Geometric).expect("valid sampling")
    }

    #[test]
    // Purpose
    // -------
    // A filled 64x64 block gives the four-fold count reduction per doubling.
    //
    // Given
    // -----
    // - 64x64 raster, every pixel set; scales 1..64 doubling.
    //
    // Expect
    // ------
    // - Counts {4096, 1024, 256, 64, 16, 4, 1}.
    fn box_counting_filled_block() {
        // Arrange
        let raster = BinaryRaster::from_fn(64, 64, |_, _| true);

        // Act
        let curve = box_counting(Dataset::Raster(&raster), &doubling(64.0), &Default::default(), &ctx())
            .expect("counting succeeds");

        // Assert
        assert_eq!(curve.values(), &[4096.0, 1024.0, 256.0, 64.0, 16.0, 4.0, 1.0]);
        assert_eq!(curve.sign(), Sign::Negative);
    }

    #[test]
    // Purpose
    // -------
    // A straight 128-unit segment gives the two-fold reduction per doubling.
    fn box_counting_straight_line() {
        // Arrange
        let line = PolylineSet::new(vec![vec![[0.0, 0.0], [128.0, 0.0]]]).expect("valid line");

        // Act
        let curve = box_counting(Dataset::Vector(&line), &doubling(64.0), &Default::default(), &ctx())
            .expect("counting succeeds");

        // Assert
        assert_eq!(curve.values(), &[128.0, 64.0, 32.0, 16.0, 8.0, 4.0, 2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Cell-driven and feature-driven counting agree on rasters and vectors.
    //
    // Given
    // -----
    // - A sparse diagonal raster and a zig-zag polyline with points on grid
    //   lines.
    //
    // Expect
    // ------
    // - Identical curves from both pinned modes and from automatic selection.
    fn counting_modes_agree() {
        // Arrange
        let raster = BinaryRaster::from_fn(50, 30, |c, r| (c + 2 * r) % 7 == 0 || c == 49);
        let zigzag: Vec<[f64; 2]> =
            (0..20).map(|i| [i as f64 * 3.0, if i % 2 == 0 { 0.0 } else { 8.0 }]).collect();
        let lines = PolylineSet::new(vec![zigzag, vec![[4.0, 4.0], [4.0, 4.0]]]).expect("valid lines");
        let sampling = Sampling::new(1.0, 40.0, 1.5, Sequence::Geometric).expect("valid sampling");
        let opts = BoxCountingOptions::with_gliding(2.0);
        let ctx = ctx();

        for dataset in [Dataset::Raster(&raster), Dataset::Vector(&lines)] {
            // Act
            let cells =
                box_counting_with_mode(dataset, &sampling, &opts, &ctx, Some(CountingMode::CellDriven))
                    .expect("cell-driven succeeds");
            let features = box_counting_with_mode(
                dataset,
                &sampling,
                &opts,
                &ctx,
                Some(CountingMode::FeatureDriven),
            )
            .expect("feature-driven succeeds");
            let auto = box_counting(dataset, &sampling, &opts, &ctx).expect("auto succeeds");

            // Assert
            assert_eq!(cells.values(), features.values());
            assert_eq!(cells.values(), auto.values());
        }
    }

    #[test]
    // Purpose
    // -------
    // Gliding never increases a count, and the offset count follows
    // round(d * 1.2^i).
    fn gliding_takes_minimum_over_offsets() {
        // Arrange
        let pts = PointSet::new(vec![[0.9, 0.9], [1.1, 1.1], [5.0, 5.0]]).expect("valid points");
        let sampling = Sampling::new(1.0, 4.0, 2.0, Sequence::Geometric).expect("valid sampling");
        let ctx = ctx();

        // Act
        let fixed = box_counting(Dataset::Vector(&pts), &sampling, &Default::default(), &ctx)
            .expect("counting succeeds");
        let glided =
            box_counting(Dataset::Vector(&pts), &sampling, &BoxCountingOptions::with_gliding(4.0), &ctx)
                .expect("counting succeeds");

        // Assert
        for (g, f) in glided.values().iter().zip(fixed.values()) {
            assert!(g <= f);
        }
        assert_eq!(offset_count(1.0, 5), 1);
        assert_eq!(offset_count(4.0, 0), 4);
        assert_eq!(offset_count(4.0, 3), 7);
    }

    #[test]
    // Purpose
    // -------
    // Empty datasets fail fast and a raised cancel flag stops the run.
    fn box_counting_reports_empty_and_cancelled() {
        let empty = BinaryRaster::from_fn(8, 8, |_, _| false);
        let err = box_counting(Dataset::Raster(&empty), &doubling(8.0), &Default::default(), &ctx())
            .unwrap_err();
        assert_eq!(err, MeasureError::EmptyDataset);

        let full = BinaryRaster::from_fn(8, 8, |_, _| true);
        let flag = CancelFlag::new();
        let cancelled = ctx().with_cancel(flag.clone());
        flag.cancel();
        let err = box_counting(Dataset::Raster(&full), &doubling(8.0), &Default::default(), &cancelled)
            .unwrap_err();
        assert_eq!(err, MeasureError::Cancelled);
    }
}
