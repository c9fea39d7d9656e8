//! Measured `(scale, value)` series.
use serde::{Deserialize, Serialize};

use super::errors::{CurveError, CurveResult};

/// Scaling sign of a measurement: `dimension = sign * slope`.
///
/// Cumulative measures (dilation, correlation, radial) grow with the scale
/// and carry `Positive`; box counts and moment sums shrink and carry
/// `Negative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonicity {
    NonDecreasing,
    NonIncreasing,
}

impl Monotonicity {
    fn label(self) -> &'static str {
        match self {
            Monotonicity::NonDecreasing => "non-decreasing",
            Monotonicity::NonIncreasing => "non-increasing",
        }
    }
}

/// Curve — ordered scale to measure mapping produced by one measurement
/// run.
///
/// Invariants
/// ----------
/// - At least one point; scales finite, positive, strictly increasing.
/// - Values are stored as produced. Estimators reject non-finite values in
///   their active range instead of the curve rejecting them up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    scales: Vec<f64>,
    values: Vec<f64>,
    sign: Sign,
}

impl Curve {
    pub fn new(scales: Vec<f64>, values: Vec<f64>, sign: Sign) -> CurveResult<Self> {
        if scales.len() != values.len() {
            return Err(CurveError::LengthMismatch { scales: scales.len(), values: values.len() });
        }
        if scales.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        for (index, &value) in scales.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(CurveError::InvalidScale { index, value });
            }
            if index > 0 && value <= scales[index - 1] {
                return Err(CurveError::NonIncreasingScales { index });
            }
        }
        Ok(Self { scales, values, sign })
    }

    pub fn from_points(points: &[(f64, f64)], sign: Sign) -> CurveResult<Self> {
        let (scales, values) = points.iter().copied().unzip();
        Self::new(scales, values, sign)
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.scales.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at an exact curve key.
    pub fn value_at(&self, scale: f64) -> Option<f64> {
        self.index_of(scale).map(|i| self.values[i])
    }

    pub fn index_of(&self, scale: f64) -> Option<usize> {
        self.scales.binary_search_by(|s| s.total_cmp(&scale)).ok()
    }

    /// Verify the direction a strategy promises for its values.
    ///
    /// # Errors
    /// [`CurveError::NonMonotone`] at the first index that breaks the
    /// direction.
    pub fn check_monotone(&self, direction: Monotonicity) -> CurveResult<()> {
        for i in 1..self.values.len() {
            let (prev, cur) = (self.values[i - 1], self.values[i]);
            let ok = match direction {
                Monotonicity::NonDecreasing => cur >= prev,
                Monotonicity::NonIncreasing => cur <= prev,
            };
            if !ok {
                return Err(CurveError::NonMonotone {
                    index: i,
                    scale: self.scales[i],
                    expected: direction.label(),
                });
            }
        }
        Ok(())
    }

    pub fn is_monotone(&self, direction: Monotonicity) -> bool {
        self.check_monotone(direction).is_ok()
    }

    /// Local scaling exponent `sign * d ln y / d ln x` per point.
    ///
    /// Central differences inside the curve, one-sided at both ends, NaN
    /// for a single-point curve or where a value is not positive.
    pub fn scaling_behavior(&self) -> Vec<f64> {
        let n = self.len();
        if n < 2 {
            return vec![f64::NAN; n];
        }
        let sign = self.sign.value();
        (0..n)
            .map(|i| {
                let (a, b) = match i {
                    0 => (0, 1),
                    i if i == n - 1 => (n - 2, n - 1),
                    i => (i - 1, i + 1),
                };
                let (ya, yb) = (self.values[a], self.values[b]);
                if ya <= 0.0 || yb <= 0.0 {
                    return f64::NAN;
                }
                sign * (yb.ln() - ya.ln()) / (self.scales[b].ln() - self.scales[a].ln())
            })
            .collect()
    }
}
