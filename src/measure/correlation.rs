//! Correlation (pair counting) measurement.
//!
//! Raster: for every foreground pixel count the foreground pixels inside the
//! `(2i+1) x (2i+1)` window around it; the value at scale `(2i+1)*res` is
//! the mean count per foreground pixel. Vector: pairwise anchor distances
//! bucketed with the sampling's ceiling lookup, accumulated over increasing
//! scale, divided by the number of features. Both include each element
//! itself.
use log::debug;
use rayon::prelude::*;

use super::{
    errors::{MeasureError, MeasureResult},
    require_raster_sampling,
};
use crate::{
    curve::{Curve, Monotonicity, Sign},
    execution::ExecContext,
    geometry::{BinaryRaster, Envelope, EnvelopeIndex, FeatureSet, PointSet},
    sampling::Sampling,
};

/// Features per parallel batch in vector pair counting.
const POINT_BATCH: usize = 256;

fn add_into(mut a: Vec<u64>, b: Vec<u64>) -> Option<Vec<u64>> {
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    Some(a)
}

pub fn raster_correlation(
    raster: &BinaryRaster, sampling: &Sampling, ctx: &ExecContext,
) -> MeasureResult<Curve> {
    require_raster_sampling("correlation", raster, sampling)?;
    let foreground = raster.foreground_count();
    if foreground == 0 {
        return Err(MeasureError::EmptyDataset);
    }
    let radii: Vec<usize> = sampling.values().iter().map(|&s| sampling.discrete_radius(s)).collect();
    let sat = raster.summed_area_table();

    let sums = ctx
        .install(|| {
            (0..raster.height())
                .into_par_iter()
                .map(|row| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    let mut acc = vec![0u64; radii.len()];
                    for (col, &v) in raster.row(row).iter().enumerate() {
                        if v == 0 {
                            continue;
                        }
                        for (slot, &r) in acc.iter_mut().zip(&radii) {
                            *slot += sat.window_count(col, row, r);
                        }
                    }
                    Some(acc)
                })
                .try_reduce(|| vec![0u64; radii.len()], add_into)
        })
        .ok_or(MeasureError::Cancelled)?;

    let n = foreground as f64;
    let values = sums.iter().map(|&s| s as f64 / n).collect();
    debug!("raster correlation: {} scale(s), {foreground} foreground pixel(s)", radii.len());
    let curve = Curve::new(sampling.values().to_vec(), values, Sign::Positive)?;
    curve.check_monotone(Monotonicity::NonDecreasing)?;
    Ok(curve)
}

pub fn vector_correlation(
    set: &dyn FeatureSet, sampling: &Sampling, ctx: &ExecContext,
) -> MeasureResult<Curve> {
    let n = set.len();
    if n == 0 {
        return Err(MeasureError::EmptyDataset);
    }
    let anchors: Vec<[f64; 2]> = (0..n).map(|i| set.anchor(i)).map(|(x, y)| [x, y]).collect();
    let points = PointSet::new(anchors).map_err(|_| MeasureError::NonFiniteEnvelope)?;
    let index = EnvelopeIndex::build(&points);
    let reach = sampling.max_value();
    let slots = sampling.len();

    let hist = ctx
        .install(|| {
            points
                .points()
                .par_chunks(POINT_BATCH)
                .map(|batch| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    let mut acc = vec![0u64; slots];
                    let mut candidates = Vec::new();
                    for &[x, y] in batch {
                        index.query_into(&Envelope::around(x, y, reach), &mut candidates);
                        for &j in &candidates {
                            let [xj, yj] = points.points()[j];
                            if let Some(k) = sampling.ceiling_scale_index((x - xj).hypot(y - yj)) {
                                acc[k] += 1;
                            }
                        }
                    }
                    Some(acc)
                })
                .try_reduce(|| vec![0u64; slots], add_into)
        })
        .ok_or(MeasureError::Cancelled)?;

    let mut running = 0u64;
    let values = hist
        .iter()
        .map(|&h| {
            running += h;
            running as f64 / n as f64
        })
        .collect();
    let curve = Curve::new(sampling.values().to_vec(), values, Sign::Positive)?;
    curve.check_monotone(Monotonicity::NonDecreasing)?;
    Ok(curve)
}
