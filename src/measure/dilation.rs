//! Dilation (buffer growth) measurement.
//!
//! Raster: the foreground is grown by successive 8-neighbour dilations,
//! implemented as a chessboard distance transform on a raster padded by the
//! largest radius. A pixel belongs to the radius-`i` dilation iff its
//! distance is `<= i`. The curve value is the dilated area over the
//! original foreground area.
//!
//! Vector: areas come from the layer's [`BufferOracle`] at radius
//! `scale / 2`, relative to the area at the smallest scale.
//!
//! Optionally the curve stops at the first scale where the grown set is a
//! single connected component.
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    errors::{MeasureError, MeasureResult},
    require_raster_sampling,
};
use crate::{
    curve::{Curve, Monotonicity, Sign},
    execution::ExecContext,
    geometry::{BinaryRaster, BufferOracle},
    sampling::Sampling,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DilationOptions {
    /// Truncate the curve once the grown set is one connected component.
    pub stop_on_single_component: bool,
}

/// Chessboard distance to the nearest foreground pixel on a raster padded
/// by `pad` on every side, capped at `pad + 1`.
fn chessboard_distance(raster: &BinaryRaster, pad: usize) -> (Vec<u32>, usize, usize) {
    let w = raster.width() + 2 * pad;
    let h = raster.height() + 2 * pad;
    let cap = pad as u32 + 1;
    let mut dist = vec![cap; w * h];
    for row in 0..raster.height() {
        for (col, &v) in raster.row(row).iter().enumerate() {
            if v != 0 {
                dist[(row + pad) * w + col + pad] = 0;
            }
        }
    }

    // Forward pass: W, NW, N, NE.
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if dist[i] == 0 {
                continue;
            }
            let mut best = dist[i];
            if x > 0 {
                best = best.min(dist[i - 1] + 1);
            }
            if y > 0 {
                let up = i - w;
                best = best.min(dist[up] + 1);
                if x > 0 {
                    best = best.min(dist[up - 1] + 1);
                }
                if x + 1 < w {
                    best = best.min(dist[up + 1] + 1);
                }
            }
            dist[i] = best.min(cap);
        }
    }
    // Backward pass: E, SE, S, SW.
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let i = y * w + x;
            if dist[i] == 0 {
                continue;
            }
            let mut best = dist[i];
            if x + 1 < w {
                best = best.min(dist[i + 1] + 1);
            }
            if y + 1 < h {
                let down = i + w;
                best = best.min(dist[down] + 1);
                if x > 0 {
                    best = best.min(dist[down - 1] + 1);
                }
                if x + 1 < w {
                    best = best.min(dist[down + 1] + 1);
                }
            }
            dist[i] = best.min(cap);
        }
    }
    (dist, w, h)
}

/// Disjoint-set forest with a running component count.
struct Components {
    parent: Vec<u32>,
    active: Vec<bool>,
    count: usize,
}

impl Components {
    fn new(n: usize) -> Self {
        Self { parent: (0..n as u32).collect(), active: vec![false; n], count: 0 }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] as usize != i {
            let grand = self.parent[self.parent[i] as usize];
            self.parent[i] = grand;
            i = grand as usize;
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb) as u32;
            self.count -= 1;
        }
    }

    /// Activate pixel `i` and merge it with its active 8-neighbours.
    fn activate(&mut self, i: usize, w: usize, h: usize) {
        self.active[i] = true;
        self.count += 1;
        let (x, y) = ((i % w) as isize, (i / w) as isize);
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                let (nx, ny) = (x + dx, y + dy);
                if (dx, dy) == (0, 0) || nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if self.active[j] {
                    self.union(i, j);
                }
            }
        }
    }
}

/// Raster dilation curve.
///
/// Errors
/// ------
/// - `RequiresDiscreteSampling` / `ResolutionMismatch` when the sampling is
///   not snapped to this raster's pixels.
/// - `EmptyDataset` for a raster without foreground.
/// - `Cancelled` when the flag is raised.
pub fn raster_dilation(
    raster: &BinaryRaster, sampling: &Sampling, options: &DilationOptions, ctx: &ExecContext,
) -> MeasureResult<Curve> {
    require_raster_sampling("dilation", raster, sampling)?;
    let foreground = raster.foreground_count();
    if foreground == 0 {
        return Err(MeasureError::EmptyDataset);
    }

    let radii: Vec<usize> = sampling.values().iter().map(|&s| sampling.discrete_radius(s)).collect();
    let pad = radii.iter().copied().max().unwrap_or(0);
    let (dist, w, h) = chessboard_distance(raster, pad);
    if ctx.is_cancelled() {
        return Err(MeasureError::Cancelled);
    }

    let histogram = ctx
        .install(|| {
            dist.par_chunks(w)
                .map(|row| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    let mut hist = vec![0u64; pad + 1];
                    for &d in row {
                        if (d as usize) <= pad {
                            hist[d as usize] += 1;
                        }
                    }
                    Some(hist)
                })
                .try_reduce(
                    || vec![0u64; pad + 1],
                    |mut a, b| {
                        for (x, y) in a.iter_mut().zip(b) {
                            *x += y;
                        }
                        Some(a)
                    },
                )
        })
        .ok_or(MeasureError::Cancelled)?;

    let mut cumulative = histogram.clone();
    for d in 1..cumulative.len() {
        cumulative[d] += cumulative[d - 1];
    }

    let mut stop_at = radii.len();
    if options.stop_on_single_component {
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); pad + 1];
        for (i, &d) in dist.iter().enumerate() {
            if (d as usize) <= pad {
                buckets[d as usize].push(i);
            }
        }
        let mut forest = Components::new(w * h);
        let mut reached = 0usize;
        for (k, &r) in radii.iter().enumerate() {
            if ctx.is_cancelled() {
                return Err(MeasureError::Cancelled);
            }
            while reached <= r {
                for &i in &buckets[reached] {
                    forest.activate(i, w, h);
                }
                reached += 1;
            }
            if forest.count == 1 {
                stop_at = k + 1;
                break;
            }
        }
    }

    let reference = foreground as f64;
    let scales = sampling.values()[..stop_at].to_vec();
    let values = radii[..stop_at].iter().map(|&r| cumulative[r] as f64 / reference).collect();
    debug!("raster dilation: {} scale(s), pad {pad}, foreground {foreground}", scales.len());

    let curve = Curve::new(scales, values, Sign::Positive)?;
    curve.check_monotone(Monotonicity::NonDecreasing)?;
    Ok(curve)
}

/// Vector dilation curve from a buffer oracle.
///
/// Errors
/// ------
/// - `InvalidParameter` when the buffer area at the smallest scale is not
///   strictly positive (nothing to normalise by).
/// - `Curve(NonMonotone)` when the oracle reports shrinking areas.
/// - `Cancelled` when the flag is raised.
pub fn vector_dilation(
    oracle: &dyn BufferOracle, sampling: &Sampling, options: &DilationOptions, ctx: &ExecContext,
) -> MeasureResult<Curve> {
    let stop = options.stop_on_single_component;
    let measures: Vec<(f64, usize)> = ctx
        .install(|| {
            sampling
                .values()
                .par_iter()
                .map(|&scale| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    let radius = 0.5 * scale;
                    let components = if stop { oracle.components(radius) } else { 0 };
                    Some((oracle.area(radius), components))
                })
                .collect::<Option<Vec<_>>>()
        })
        .ok_or(MeasureError::Cancelled)?;

    let reference = measures[0].0;
    if !reference.is_finite() || reference <= 0.0 {
        return Err(MeasureError::InvalidParameter {
            name: "reference area",
            value: reference,
            reason: "buffer area at the smallest scale must be finite and > 0",
        });
    }
    let stop_at = if stop {
        measures.iter().position(|&(_, c)| c == 1).map_or(measures.len(), |k| k + 1)
    } else {
        measures.len()
    };

    let scales = sampling.values()[..stop_at].to_vec();
    let values = measures[..stop_at].iter().map(|&(area, _)| area / reference).collect();
    let curve = Curve::new(scales, values, Sign::Positive)?;
    curve.check_monotone(Monotonicity::NonDecreasing)?;
    Ok(curve)
}
