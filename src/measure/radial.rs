//! Radial mass measurement: mass within distance `r` of a centre.
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    checked_envelope,
    errors::{MeasureError, MeasureResult},
};
use crate::{
    curve::{Curve, Monotonicity, Sign},
    execution::ExecContext,
    geometry::Dataset,
    sampling::Sampling,
};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialOptions {
    /// Measurement centre; the dataset envelope centre when `None`.
    pub center: Option<[f64; 2]>,
}

/// Cumulative mass within each probe radius of the centre.
///
/// Raster foreground pixels weigh 1 at their centres; vector features
/// contribute their mass at their anchor. Mass beyond the largest scale is
/// ignored.
pub fn radial(
    dataset: Dataset<'_>, sampling: &Sampling, options: &RadialOptions, ctx: &ExecContext,
) -> MeasureResult<Curve> {
    let envelope = checked_envelope(&dataset)?;
    let (cx, cy) = match options.center {
        Some([x, y]) if x.is_finite() && y.is_finite() => (x, y),
        Some([x, _]) => {
            return Err(MeasureError::InvalidParameter {
                name: "center",
                value: x,
                reason: "centre coordinates must be finite",
            });
        }
        None => envelope.center(),
    };
    let slots = sampling.len();
    let bucket = |x: f64, y: f64| sampling.ceiling_scale_index((x - cx).hypot(y - cy));

    // Partial histograms are merged in batch order so float sums do not
    // depend on scheduling.
    let partials: Vec<Vec<f64>> = match dataset {
        Dataset::Raster(raster) => ctx.install(|| {
            (0..raster.height())
                .into_par_iter()
                .map(|row| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    let mut acc = vec![0.0; slots];
                    for (col, &v) in raster.row(row).iter().enumerate() {
                        if v == 0 {
                            continue;
                        }
                        let (x, y) = raster.pixel_center(col, row);
                        if let Some(k) = bucket(x, y) {
                            acc[k] += 1.0;
                        }
                    }
                    Some(acc)
                })
                .collect::<Option<Vec<_>>>()
        }),
        Dataset::Vector(set) => ctx.install(|| {
            (0..set.len())
                .collect::<Vec<_>>()
                .par_chunks(1024)
                .map(|batch| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    let mut acc = vec![0.0; slots];
                    for &i in batch {
                        let (x, y) = set.anchor(i);
                        if let Some(k) = bucket(x, y) {
                            acc[k] += set.mass(i);
                        }
                    }
                    Some(acc)
                })
                .collect::<Option<Vec<_>>>()
        }),
    }
    .ok_or(MeasureError::Cancelled)?;

    let mut hist = vec![0.0; slots];
    for part in partials {
        for (h, p) in hist.iter_mut().zip(part) {
            *h += p;
        }
    }
    let mut running = 0.0;
    let values = hist
        .into_iter()
        .map(|h| {
            running += h;
            running
        })
        .collect();

    let curve = Curve::new(sampling.values().to_vec(), values, Sign::Positive)?;
    curve.check_monotone(Monotonicity::NonDecreasing)?;
    Ok(curve)
}
