//! Scale set generation, discrete snapping and ceiling lookup.
use serde::{Deserialize, Serialize};

use super::{
    errors::{SamplingError, SamplingResult},
    sequence::{MaxHeuristic, Sequence},
    validation::{validate_bounds, validate_coef, validate_resolution},
};
use crate::geometry::Envelope;

/// Relative tolerance on the upper bound, so that `1 * 2^3 <= 8` holds
/// despite rounding in the progression.
pub const UPPER_TOLERANCE: f64 = 1e-9;
/// Hard cap on the number of generated raw values.
pub const MAX_SCALES: usize = 100_000;

/// Snap `value` to the nearest odd multiple `(2i + 1) * resolution`,
/// `i >= 0`.
///
/// Idempotent: snapping an already snapped value returns it unchanged.
#[inline]
pub fn snap_discrete(value: f64, resolution: f64) -> f64 {
    (2.0 * discrete_index(value, resolution) as f64 + 1.0) * resolution
}

#[inline]
fn discrete_index(value: f64, resolution: f64) -> usize {
    let i = ((value / resolution - 1.0) / 2.0).round();
    if i <= 0.0 { 0 } else { i as usize }
}

/// Sampling — immutable, strictly increasing set of probe scales.
///
/// Purpose
/// -------
/// Produce the scales every measurement strategy iterates over and map an
/// arbitrary measured distance back to the probe scale that covers it.
///
/// Invariants
/// ----------
/// - `values()` is non-empty, finite, strictly increasing and lies in
///   `[min_size, max_size]`.
/// - When discrete, every value is an odd multiple of `resolution`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sampling {
    min_size: f64,
    max_size: f64,
    coef: f64,
    sequence: Sequence,
    discrete: bool,
    resolution: f64,
    values: Vec<f64>,
}

impl Sampling {
    /// Continuous sampling.
    ///
    /// # Errors
    /// Any bound or coefficient violation, or an empty sequence.
    pub fn new(min_size: f64, max_size: f64, coef: f64, sequence: Sequence) -> SamplingResult<Self> {
        Self::build(min_size, max_size, coef, sequence, None)
    }

    /// Sampling snapped to odd multiples of `resolution`.
    pub fn discrete(
        min_size: f64, max_size: f64, coef: f64, sequence: Sequence, resolution: f64,
    ) -> SamplingResult<Self> {
        validate_resolution(resolution)?;
        Self::build(min_size, max_size, coef, sequence, Some(resolution))
    }

    fn build(
        min_size: f64, max_size: f64, coef: f64, sequence: Sequence, resolution: Option<f64>,
    ) -> SamplingResult<Self> {
        validate_bounds(min_size, max_size)?;
        validate_coef(coef, sequence)?;

        let upper = max_size * (1.0 + UPPER_TOLERANCE);
        let lower = min_size * (1.0 - UPPER_TOLERANCE);
        let mut values: Vec<f64> = Vec::new();
        let mut raw = min_size;
        let mut steps = 0usize;
        while raw <= upper {
            steps += 1;
            if steps > MAX_SCALES {
                return Err(SamplingError::TooManyScales { limit: MAX_SCALES });
            }
            let v = resolution.map_or(raw, |res| snap_discrete(raw, res));
            if v >= lower && v <= upper && values.last().is_none_or(|&last| v > last) {
                values.push(v);
            }
            let next = sequence.step(raw, coef);
            if next <= raw {
                return Err(SamplingError::TooManyScales { limit: MAX_SCALES });
            }
            raw = next;
        }
        if values.is_empty() {
            return Err(SamplingError::EmptySequence { min: min_size, max: max_size });
        }

        Ok(Self {
            min_size,
            max_size,
            coef,
            sequence,
            discrete: resolution.is_some(),
            resolution: resolution.unwrap_or(0.0),
            values,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    pub fn max_size(&self) -> f64 {
        self.max_size
    }

    pub fn coef(&self) -> f64 {
        self.coef
    }

    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    pub fn is_discrete(&self) -> bool {
        self.discrete
    }

    /// Snapping resolution; `None` for continuous sampling.
    pub fn resolution(&self) -> Option<f64> {
        self.discrete.then_some(self.resolution)
    }

    /// Largest probe scale.
    pub fn max_value(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Apply this sampling's snapping rule to a raw value.
    pub fn snap(&self, value: f64) -> f64 {
        if self.discrete { snap_discrete(value, self.resolution) } else { value }
    }

    /// Pixel half-width `i` of a scale `(2i + 1) * resolution`; 0 for
    /// continuous sampling.
    pub fn discrete_radius(&self, scale: f64) -> usize {
        if self.discrete { discrete_index(scale, self.resolution) } else { 0 }
    }

    /// Index of the smallest probe scale `>= x`, `None` beyond the largest.
    ///
    /// Binary search over the generated set, so the lookup uses exactly the
    /// snapped values that `values()` returns.
    pub fn ceiling_scale_index(&self, x: f64) -> Option<usize> {
        if x.is_nan() {
            return None;
        }
        let idx = self.values.partition_point(|&v| v < x);
        (idx < self.values.len()).then_some(idx)
    }

    pub fn ceiling_scale(&self, x: f64) -> Option<f64> {
        self.ceiling_scale_index(x).map(|i| self.values[i])
    }
}

/// SamplingOptions — caller-facing sampling parameters with lazy defaults.
///
/// Fields
/// ------
/// - `min_size`, `max_size`: `0` means "derive from the dataset": the
///   minimum becomes the dataset resolution and the maximum follows
///   `heuristic`.
/// - `heuristic`: `None` defers to the method being run (see
///   [`SamplingOptions::or_heuristic`]); unresolved it falls back to
///   [`MaxHeuristic::HalfMinDimension`].
/// - `coef`, `sequence`: progression.
/// - `discrete`: snap to odd pixel multiples (raster strategies).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    pub min_size: f64,
    pub max_size: f64,
    pub coef: f64,
    pub sequence: Sequence,
    pub discrete: bool,
    pub heuristic: Option<MaxHeuristic>,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            min_size: 0.0,
            max_size: 0.0,
            coef: 2.0,
            sequence: Sequence::Geometric,
            discrete: false,
            heuristic: None,
        }
    }
}

impl SamplingOptions {
    pub fn new(min_size: f64, max_size: f64, coef: f64, sequence: Sequence) -> Self {
        Self { min_size, max_size, coef, sequence, ..Self::default() }
    }

    pub fn with_discrete(mut self, discrete: bool) -> Self {
        self.discrete = discrete;
        self
    }

    pub fn with_heuristic(mut self, heuristic: MaxHeuristic) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    /// Fill an unset heuristic with the method's own default.
    pub fn or_heuristic(mut self, heuristic: MaxHeuristic) -> Self {
        self.heuristic.get_or_insert(heuristic);
        self
    }

    /// Resolve zero bounds against a dataset and build the [`Sampling`].
    ///
    /// # Errors
    /// - [`SamplingError::UnresolvedDefault`] when a bound is 0 and the
    ///   dataset provides no envelope/resolution.
    /// - Any [`Sampling`] construction error. `min > max` after resolution
    ///   is reported, never corrected.
    pub fn resolve(
        &self, envelope: Option<&Envelope>, resolution: Option<f64>,
    ) -> SamplingResult<Sampling> {
        let min_size = if self.min_size == 0.0 {
            resolution.ok_or(SamplingError::UnresolvedDefault { bound: "minimum" })?
        } else {
            self.min_size
        };
        let max_size = if self.max_size == 0.0 {
            envelope
                .map(|env| self.heuristic.unwrap_or_default().default_max(env))
                .ok_or(SamplingError::UnresolvedDefault { bound: "maximum" })?
        } else {
            self.max_size
        };
        if self.discrete {
            let res = resolution.ok_or(SamplingError::InvalidResolution { value: 0.0 })?;
            Sampling::discrete(min_size, max_size, self.coef, self.sequence, res)
        } else {
            Sampling::new(min_size, max_size, self.coef, self.sequence)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Sequence generation, snapping, ceiling lookup and default resolution.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Geometric and arithmetic progressions produce the documented sets.
    //
    // Given
    // -----
    // - min = 1, max = 10, coef = 2.
    //
    // Expect
    // ------
    // - Geometric: {1, 2, 4, 8}. Arithmetic: {1, 3, 5, 7, 9}.
    fn sampling_values_follow_progression() {
        // Act
        let geom = Sampling::new(1.0, 10.0, 2.0, Sequence::Geometric).expect("valid sampling");
        let arith = Sampling::new(1.0, 10.0, 2.0, Sequence::Arithmetic).expect("valid sampling");

        // Assert
        assert_eq!(geom.values(), &[1.0, 2.0, 4.0, 8.0]);
        assert_eq!(arith.values(), &[1.0, 3.0, 5.0, 7.0, 9.0]);
    }

    #[test]
    // Purpose
    // -------
    // The upper bound is inclusive even when it equals a generated value.
    fn sampling_upper_bound_is_inclusive() {
        let s = Sampling::new(1.0, 64.0, 2.0, Sequence::Geometric).expect("valid sampling");
        assert_eq!(s.values(), &[1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0]);
    }

    #[test]
    // Purpose
    // -------
    // Discrete snapping yields odd pixel multiples, collapses duplicates and
    // is idempotent.
    //
    // Given
    // -----
    // - Geometric, min 1, max 64, coef 2, resolution 1.
    //
    // Expect
    // ------
    // - {1, 3, 5, 9, 17, 33} (65 exceeds the bound and is dropped).
    // - snap(snap(v)) == snap(v) for a spread of raw values.
    fn discrete_snapping_is_odd_and_idempotent() {
        // Act
        let s = Sampling::discrete(1.0, 64.0, 2.0, Sequence::Geometric, 1.0)
            .expect("valid sampling");

        // Assert
        assert_eq!(s.values(), &[1.0, 3.0, 5.0, 9.0, 17.0, 33.0]);
        for raw in [0.2, 1.0, 1.9, 2.0, 2.5, 7.3, 12.0, 100.0] {
            let once = snap_discrete(raw, 0.5);
            assert_relative_eq!(snap_discrete(once, 0.5), once);
        }
        assert_eq!(s.discrete_radius(9.0), 4);
    }

    #[test]
    // Purpose
    // -------
    // Arithmetic steps that snap to the same odd multiple collapse.
    fn discrete_arithmetic_collapses_duplicates() {
        let s = Sampling::discrete(1.0, 9.0, 1.0, Sequence::Arithmetic, 2.0)
            .expect("valid sampling");
        // raw 1..=9 snap to 2 2 2 6 6 6 6 10 10; 10 exceeds the bound
        assert_eq!(s.values(), &[2.0, 6.0]);
    }

    #[test]
    // Purpose
    // -------
    // Ceiling lookup returns the smallest scale >= x and None past the end.
    fn ceiling_scale_lookup() {
        let s = Sampling::new(1.0, 10.0, 2.0, Sequence::Geometric).expect("valid sampling");
        assert_eq!(s.ceiling_scale_index(0.0), Some(0));
        assert_eq!(s.ceiling_scale_index(2.0), Some(1));
        assert_eq!(s.ceiling_scale(2.1), Some(4.0));
        assert_eq!(s.ceiling_scale(8.0), Some(8.0));
        assert_eq!(s.ceiling_scale_index(8.5), None);
    }

    #[test]
    // Purpose
    // -------
    // Invalid configurations are reported, never corrected.
    fn sampling_rejects_invalid_configuration() {
        assert_eq!(
            Sampling::new(10.0, 1.0, 2.0, Sequence::Geometric),
            Err(SamplingError::MinExceedsMax { min: 10.0, max: 1.0 })
        );
        assert!(matches!(
            Sampling::new(1.0, 10.0, 1.0, Sequence::Geometric),
            Err(SamplingError::InvalidCoefficient { .. })
        ));
        assert!(matches!(
            Sampling::discrete(1.0, 10.0, 2.0, Sequence::Geometric, 0.0),
            Err(SamplingError::InvalidResolution { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Zero bounds resolve from the dataset and the heuristic choice matters.
    //
    // Given
    // -----
    // - A 100 x 40 envelope, resolution 1.
    //
    // Expect
    // ------
    // - HalfMinDimension: max 20. MaxDimension: max 100.
    fn sampling_options_resolve_defaults() {
        // Arrange
        let env = Envelope::new(0.0, 0.0, 100.0, 40.0);
        let half = SamplingOptions::default();
        let full = SamplingOptions::default().with_heuristic(MaxHeuristic::MaxDimension);

        // Act
        let a = half.resolve(Some(&env), Some(1.0)).expect("resolvable");
        let b = full.resolve(Some(&env), Some(1.0)).expect("resolvable");

        // Assert
        assert_eq!(a.min_size(), 1.0);
        assert_eq!(a.max_size(), 20.0);
        assert_eq!(a.max_value(), 16.0);
        assert_eq!(b.max_size(), 100.0);
        assert_eq!(b.max_value(), 64.0);
        assert_eq!(
            half.resolve(None, Some(1.0)),
            Err(SamplingError::UnresolvedDefault { bound: "maximum" })
        );
    }

    #[test]
    // Purpose
    // -------
    // A method default only fills an unset heuristic.
    //
    // Given
    // -----
    // - Unset options, and options explicitly set to HalfMinDimension.
    //
    // Expect
    // ------
    // - Unset takes MaxDimension; the explicit choice is kept.
    fn or_heuristic_fills_only_unset_choice() {
        // Arrange
        let unset = SamplingOptions::default();
        let explicit = SamplingOptions::default().with_heuristic(MaxHeuristic::HalfMinDimension);

        // Act
        let filled = unset.or_heuristic(MaxHeuristic::MaxDimension);
        let kept = explicit.or_heuristic(MaxHeuristic::MaxDimension);

        // Assert
        assert_eq!(filled.heuristic, Some(MaxHeuristic::MaxDimension));
        assert_eq!(kept.heuristic, Some(MaxHeuristic::HalfMinDimension));
    }
}
