//! Fitting sub-range of a curve.
use serde::{Deserialize, Serialize};

use super::{
    errors::{CurveError, CurveResult},
    series::Curve,
};

/// Range — inclusive `[low, high]` snapped to existing curve keys.
///
/// `low` moves up to the smallest key `>= low`, `high` moves down to the
/// largest key `<= high`. A range stores scale values, not indices, so the
/// same range applies to every curve sharing the key set (e.g. the per-q
/// moment curves).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    low: f64,
    high: f64,
}

impl Range {
    /// Snap `[low, high]` to `curve`.
    ///
    /// # Errors
    /// - [`CurveError::InvalidRange`] for NaN bounds or `low > high`.
    /// - [`CurveError::EmptyRange`] when no key falls inside.
    pub fn new(curve: &Curve, low: f64, high: f64) -> CurveResult<Self> {
        let (start, end) = snap_indices(curve.scales(), low, high)?;
        Ok(Self { low: curve.scales()[start], high: curve.scales()[end] })
    }

    /// Range covering every curve point.
    pub fn full(curve: &Curve) -> Self {
        let scales = curve.scales();
        Self { low: scales[0], high: scales[scales.len() - 1] }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.low && scale <= self.high
    }

    /// Inclusive index bounds of this range on `curve`.
    pub fn indices(&self, curve: &Curve) -> CurveResult<(usize, usize)> {
        snap_indices(curve.scales(), self.low, self.high)
    }

    /// Number of curve points selected on `curve`.
    pub fn point_count(&self, curve: &Curve) -> CurveResult<usize> {
        let (start, end) = self.indices(curve)?;
        Ok(end - start + 1)
    }
}

fn snap_indices(scales: &[f64], low: f64, high: f64) -> CurveResult<(usize, usize)> {
    if low.is_nan() || high.is_nan() || low > high {
        return Err(CurveError::InvalidRange { low, high });
    }
    let start = scales.partition_point(|&s| s < low);
    let end_exclusive = scales.partition_point(|&s| s <= high);
    if start >= end_exclusive {
        return Err(CurveError::EmptyRange { low, high });
    }
    Ok((start, end_exclusive - 1))
}
