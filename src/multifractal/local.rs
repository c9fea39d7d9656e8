//! Local Hölder exponents of a raster.
use ndarray::Array2;
use rayon::prelude::*;

use super::errors::{MultifractalError, MultifractalResult};
use crate::{
    estimation::{OlsFit, validation::MIN_POINTS},
    execution::ExecContext,
    geometry::BinaryRaster,
    measure::{MeasureError, require_raster_sampling},
    sampling::Sampling,
};

/// Per-pixel Hölder exponent: the log-log slope of window mass against
/// window size `(2i + 1) · resolution`, over the sampling's pixel radii.
///
/// Returns a `height × width` array. Background pixels are NaN, and so is
/// any pixel whose fit fails (fewer than three distinct radii, a degenerate
/// regression); such failures never abort the sweep.
///
/// # Errors
/// - `Measure(EmptyDataset)` for an empty raster.
/// - `Measure(RequiresDiscreteSampling | ResolutionMismatch)` when the
///   sampling is not snapped to this raster's pixels.
/// - `Cancelled` when the context's flag is raised between rows.
pub fn holder_map(
    raster: &BinaryRaster, sampling: &Sampling, ctx: &ExecContext,
) -> MultifractalResult<Array2<f64>> {
    if raster.foreground_count() == 0 {
        return Err(MeasureError::EmptyDataset.into());
    }
    require_raster_sampling("local holder", raster, sampling)?;
    let radii: Vec<usize> = sampling.values().iter().map(|&s| sampling.discrete_radius(s)).collect();
    let res = raster.resolution();
    let log_sizes: Vec<f64> = radii.iter().map(|&i| ((2 * i + 1) as f64 * res).ln()).collect();
    let table = raster.summed_area_table();
    let (width, height) = (raster.width(), raster.height());

    let rows = ctx
        .install(|| {
            (0..height)
                .into_par_iter()
                .map(|row| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    let mut out = vec![f64::NAN; width];
                    let mut log_mass = vec![0.0; radii.len()];
                    for (col, slot) in out.iter_mut().enumerate() {
                        if !raster.is_set(col, row) {
                            continue;
                        }
                        for (m, &i) in log_mass.iter_mut().zip(&radii) {
                            *m = (table.window_count(col, row, i) as f64).ln();
                        }
                        *slot = local_slope(&log_sizes, &log_mass);
                    }
                    Some(out)
                })
                .collect::<Option<Vec<_>>>()
        })
        .ok_or(MultifractalError::Cancelled)?;

    Ok(Array2::from_shape_fn((height, width), |(r, c)| rows[r][c]))
}

fn local_slope(log_sizes: &[f64], log_mass: &[f64]) -> f64 {
    if log_sizes.len() < MIN_POINTS {
        return f64::NAN;
    }
    match OlsFit::fit(log_sizes, log_mass) {
        Ok(fit) if fit.slope.is_finite() => fit.slope,
        _ => f64::NAN,
    }
}
