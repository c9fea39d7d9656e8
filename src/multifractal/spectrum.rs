//! Spectrum assembly from per-q exponents.
use serde::Serialize;

use super::errors::{MultifractalError, MultifractalResult};

/// `q` values closer than this to 1 use the information dimension.
pub const Q_ONE_TOLERANCE: f64 = 1e-12;

/// One row of the spectrum.
///
/// - `tau`: mass exponent, `sign · slope` of the `Z(q)` fit.
/// - `dq`: `τ / (1 − q)`; at `q = 1` the information dimension, `None`
///   when that was not computed.
/// - `alpha`, `f_alpha`: Legendre transform by backward difference, `None`
///   for the smallest q.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumPoint {
    pub q: f64,
    pub tau: f64,
    pub dq: Option<f64>,
    pub alpha: Option<f64>,
    pub f_alpha: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultifractalSpectrum {
    pub points: Vec<SpectrumPoint>,
    pub d1: Option<f64>,
}

impl MultifractalSpectrum {
    /// Assemble from ascending `qs` and their `taus`.
    pub fn assemble(qs: &[f64], taus: &[f64], d1: Option<f64>) -> Self {
        let mut points: Vec<SpectrumPoint> = Vec::with_capacity(qs.len());
        for (k, (&q, &tau)) in qs.iter().zip(taus).enumerate() {
            let dq = if (q - 1.0).abs() < Q_ONE_TOLERANCE { d1 } else { Some(tau / (1.0 - q)) };
            let alpha = (k > 0).then(|| -(tau - taus[k - 1]) / (q - qs[k - 1]));
            let f_alpha = alpha.map(|a| tau + q * a);
            points.push(SpectrumPoint { q, tau, dq, alpha, f_alpha });
        }
        Self { points, d1 }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn q_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.q)
    }

    pub fn point(&self, q: f64) -> Option<&SpectrumPoint> {
        self.points.iter().find(|p| p.q == q)
    }
}

/// Sorted, deduplicated copy of a q set.
///
/// # Errors
/// `EmptyQValues` or `NonFiniteQ` for the first offending entry.
pub fn normalize_q_values(qs: &[f64]) -> MultifractalResult<Vec<f64>> {
    if qs.is_empty() {
        return Err(MultifractalError::EmptyQValues);
    }
    if let Some((index, &value)) = qs.iter().enumerate().find(|(_, q)| !q.is_finite()) {
        return Err(MultifractalError::NonFiniteQ { index, value });
    }
    let mut sorted = qs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    Ok(sorted)
}

/// `−5, −4.5, …, 5`.
pub fn default_q_values() -> Vec<f64> {
    (-10..=10).map(|k| f64::from(k) * 0.5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // A monofractal `τ(q) = D (1 − q)` gives `D_q = α = f(α) = D`.
    //
    // Given
    // -----
    // - q ∈ {−1, 0, 1, 2}, D = 1.5, D1 = 1.5.
    //
    // Expect
    // ------
    // - Every dq is 1.5; alpha/f_alpha are None for q = −1 and 1.5 elsewhere.
    fn assemble_monofractal() {
        // Arrange
        let qs = [-1.0, 0.0, 1.0, 2.0];
        let taus: Vec<f64> = qs.iter().map(|q| 1.5 * (1.0 - q)).collect();

        // Act
        let spectrum = MultifractalSpectrum::assemble(&qs, &taus, Some(1.5));

        // Assert
        assert_eq!(spectrum.points[0].alpha, None);
        assert_eq!(spectrum.points[0].f_alpha, None);
        for point in &spectrum.points {
            assert_relative_eq!(point.dq.expect("dq"), 1.5, epsilon = 1e-12);
        }
        for point in &spectrum.points[1..] {
            assert_relative_eq!(point.alpha.expect("alpha"), 1.5, epsilon = 1e-12);
            assert_relative_eq!(point.f_alpha.expect("f"), 1.5, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Without an information dimension, `D_1` is left undefined.
    fn assemble_without_d1() {
        let spectrum = MultifractalSpectrum::assemble(&[0.0, 1.0], &[2.0, 0.0], None);
        assert_eq!(spectrum.point(1.0).and_then(|p| p.dq), None);
        assert_eq!(spectrum.point(0.0).and_then(|p| p.dq), Some(2.0));
    }

    #[test]
    // Purpose
    // -------
    // q sets are sorted and deduplicated; non-finite entries are rejected.
    fn normalize_q_values_sorts_and_validates() {
        assert_eq!(normalize_q_values(&[2.0, -1.0, 2.0]).unwrap(), vec![-1.0, 2.0]);
        assert_eq!(normalize_q_values(&[]).unwrap_err(), MultifractalError::EmptyQValues);
        assert!(matches!(
            normalize_q_values(&[0.0, f64::NAN]),
            Err(MultifractalError::NonFiniteQ { index: 1, .. })
        ));
        assert_eq!(default_q_values().len(), 21);
    }
}
