//! Normalised box masses per scale and their moment sums.
use std::collections::BTreeMap;

use log::debug;
use rayon::prelude::*;

use super::errors::{MultifractalError, MultifractalResult};
use crate::{
    curve::{Curve, Sign},
    execution::ExecContext,
    geometry::{Dataset, Envelope},
    measure::{checked_envelope, grid::BoxGrid},
    sampling::Sampling,
};

/// MassProfile — probabilities `p_i` of the occupied boxes at one scale.
///
/// Invariants
/// ----------
/// - Every `p_i > 0` and `Σ p_i = 1` up to rounding.
/// - Boxes are listed in row-major cell order, so sums over `p_i` do not
///   depend on how the masses were gathered.
#[derive(Debug, Clone, PartialEq)]
pub struct MassProfile {
    scale: f64,
    probabilities: Vec<f64>,
}

impl MassProfile {
    /// Normalise raw box masses; empty boxes are dropped.
    pub fn from_masses(
        scale: f64, masses: impl IntoIterator<Item = f64>,
    ) -> MultifractalResult<Self> {
        let masses: Vec<f64> = masses.into_iter().filter(|&m| m > 0.0).collect();
        let total: f64 = masses.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            return Err(MultifractalError::ZeroTotalMass { scale });
        }
        Ok(Self { scale, probabilities: masses.into_iter().map(|m| m / total).collect() })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn occupied(&self) -> usize {
        self.probabilities.len()
    }

    /// `Z(q) = Σ p_i^q`; `Z(0)` is the occupied box count.
    pub fn moment(&self, q: f64) -> f64 {
        if q == 0.0 {
            return self.occupied() as f64;
        }
        self.probabilities.iter().map(|p| p.powf(q)).sum()
    }

    /// `Σ p_i ln p_i`.
    pub fn entropy_sum(&self) -> f64 {
        self.probabilities.iter().map(|&p| p * p.ln()).sum()
    }
}

/// Box masses at `scale` over a grid anchored at `envelope`.
///
/// Raster foreground pixels weigh 1 at their centres; vector features put
/// their mass at their anchor.
pub fn mass_profile(
    dataset: Dataset<'_>, envelope: &Envelope, scale: f64,
) -> MultifractalResult<MassProfile> {
    let grid = BoxGrid::covering(envelope, scale, 0.0);
    let ncols = grid.ncols() as u64;
    let cell = |x: f64, y: f64| grid.row_of(y) as u64 * ncols + grid.column_of(x) as u64;
    let mut boxes: BTreeMap<u64, f64> = BTreeMap::new();
    match dataset {
        Dataset::Raster(raster) => {
            for row in 0..raster.height() {
                for (col, &v) in raster.row(row).iter().enumerate() {
                    if v != 0 {
                        let (x, y) = raster.pixel_center(col, row);
                        *boxes.entry(cell(x, y)).or_insert(0.0) += 1.0;
                    }
                }
            }
        }
        Dataset::Vector(set) => {
            for i in 0..set.len() {
                let (x, y) = set.anchor(i);
                *boxes.entry(cell(x, y)).or_insert(0.0) += set.mass(i);
            }
        }
    }
    MassProfile::from_masses(scale, boxes.into_values())
}

/// One [`MassProfile`] per sampling scale, computed in parallel over scales.
///
/// # Errors
/// - `Measure(EmptyDataset)` / `Measure(NonFiniteEnvelope)` before any work
///   is dispatched.
/// - `Cancelled` when the context's flag is raised; scales not yet started
///   are skipped and nothing is returned.
pub fn mass_profiles(
    dataset: Dataset<'_>, sampling: &Sampling, ctx: &ExecContext,
) -> MultifractalResult<Vec<MassProfile>> {
    let envelope = checked_envelope(&dataset)?;
    let profiles = ctx
        .install(|| {
            sampling
                .values()
                .par_iter()
                .map(|&scale| {
                    if ctx.is_cancelled() {
                        return None;
                    }
                    Some(mass_profile(dataset, &envelope, scale))
                })
                .collect::<Option<Vec<_>>>()
        })
        .ok_or(MultifractalError::Cancelled)?;
    let profiles = profiles.into_iter().collect::<MultifractalResult<Vec<_>>>()?;
    debug!("multifractal: {} mass profiles over {}", profiles.len(), dataset.label());
    Ok(profiles)
}

/// `(scale, Z(q, scale))` curve; sign −1 so that `τ(q) = −slope`.
pub fn moment_curve(profiles: &[MassProfile], q: f64) -> MultifractalResult<Curve> {
    let scales = profiles.iter().map(MassProfile::scale).collect();
    let values = profiles.iter().map(|p| p.moment(q)).collect();
    Ok(Curve::new(scales, values, Sign::Negative)?)
}
