//! Range extraction and value checks shared by the estimators.
use super::errors::{EstResult, EstimationError};
use crate::curve::{Curve, Range};

/// Minimum number of range points for any estimator.
pub const MIN_POINTS: usize = 3;

/// `(scale, value)` pairs inside `range`, in scale order.
///
/// # Errors
/// - Curve/range errors when the range does not snap onto `curve`.
/// - `InsufficientPoints` with fewer than [`MIN_POINTS`] points.
/// - `NonFiniteValue` for the first NaN/∞ measure; the index is the curve
///   index.
pub fn range_points(curve: &Curve, range: &Range) -> EstResult<Vec<(f64, f64)>> {
    let (start, end) = range.indices(curve)?;
    let found = end - start + 1;
    if found < MIN_POINTS {
        return Err(EstimationError::InsufficientPoints { found, required: MIN_POINTS });
    }
    let scales = &curve.scales()[start..=end];
    let values = &curve.values()[start..=end];
    let mut points = Vec::with_capacity(found);
    for (offset, (&scale, &value)) in scales.iter().zip(values).enumerate() {
        if !value.is_finite() {
            return Err(EstimationError::NonFiniteValue { index: start + offset, scale, value });
        }
        points.push((scale, value));
    }
    Ok(points)
}

/// Reject non-positive measures before taking logarithms.
///
/// `first_index` is the curve index of `points[0]`, so the reported index
/// matches `NonFiniteValue`'s.
pub fn require_positive(points: &[(f64, f64)], first_index: usize) -> EstResult<()> {
    match points.iter().enumerate().find(|(_, (_, v))| *v <= 0.0) {
        Some((offset, &(scale, value))) => {
            Err(EstimationError::NonPositiveValue { index: first_index + offset, scale, value })
        }
        None => Ok(()),
    }
}

/// Number of distinct scales among `points`.
pub fn distinct_scales(points: &[(f64, f64)]) -> usize {
    let mut scales: Vec<f64> = points.iter().map(|p| p.0).collect();
    scales.sort_by(f64::total_cmp);
    scales.dedup();
    scales.len()
}
