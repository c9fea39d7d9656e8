//! Student-t intervals, p-values and sample percentiles.
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::inference::errors::{InferenceError, InferenceResult};

/// Default two-sided confidence level.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

fn students_t(dof: f64) -> InferenceResult<StudentsT> {
    StudentsT::new(0.0, 1.0, dof).map_err(|e| InferenceError::Distribution { text: e.to_string() })
}

fn verify_level(level: f64) -> InferenceResult<()> {
    if !(level > 0.0 && level < 1.0) {
        return Err(InferenceError::InvalidConfidenceLevel { level });
    }
    Ok(())
}

/// Two-sided critical value `t_{(1+level)/2, dof}`.
pub fn student_t_quantile(level: f64, dof: usize) -> InferenceResult<f64> {
    verify_level(level)?;
    if dof == 0 {
        return Err(InferenceError::InsufficientDegreesOfFreedom { observations: 0, parameters: 0 });
    }
    Ok(students_t(dof as f64)?.inverse_cdf(0.5 * (1.0 + level)))
}

/// Two-sided p-value of a t statistic.
///
/// An infinite statistic (zero standard error with a non-zero estimate)
/// gives 0; NaN (0/0) gives 1.
pub fn two_sided_p_value(t_stat: f64, dof: usize) -> InferenceResult<f64> {
    if dof == 0 {
        return Err(InferenceError::InsufficientDegreesOfFreedom { observations: 0, parameters: 0 });
    }
    if t_stat.is_nan() {
        return Ok(1.0);
    }
    if t_stat.is_infinite() {
        return Ok(0.0);
    }
    let dist = students_t(dof as f64)?;
    Ok((2.0 * dist.sf(t_stat.abs())).clamp(0.0, 1.0))
}

/// Symmetric interval `estimate ± t · se`.
pub fn confidence_interval(
    estimate: f64, standard_error: f64, dof: usize, level: f64,
) -> InferenceResult<(f64, f64)> {
    let half = student_t_quantile(level, dof)? * standard_error;
    Ok((estimate - half, estimate + half))
}

/// Linear-interpolation percentile of an ascending sample (type 7).
///
/// `p` in `[0, 1]`. The caller guarantees `sorted` is ascending.
pub fn percentile(sorted: &[f64], p: f64) -> InferenceResult<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(InferenceError::InvalidProbability { p });
    }
    match sorted.len() {
        0 => Err(InferenceError::EmptySample),
        1 => Ok(sorted[0]),
        n => {
            let h = (n - 1) as f64 * p;
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
        }
    }
}

/// Central percentile interval of a sample at `level`.
///
/// Sorts a copy; rejects empty or non-finite samples.
pub fn percentile_interval(sample: &[f64], level: f64) -> InferenceResult<(f64, f64)> {
    verify_level(level)?;
    if let Some((index, &value)) = sample.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteSample { index, value });
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let tail = 0.5 * (1.0 - level);
    Ok((percentile(&sorted, tail)?, percentile(&sorted, 1.0 - tail)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Critical values match tabulated Student-t quantiles.
    fn student_t_quantile_matches_tables() {
        assert_relative_eq!(student_t_quantile(0.95, 10).unwrap(), 2.228_138_851_986, epsilon = 1e-6);
        assert_relative_eq!(student_t_quantile(0.95, 1).unwrap(), 12.706_204_736_2, epsilon = 1e-4);
        assert!(student_t_quantile(1.0, 10).is_err());
    }

    #[test]
    // Purpose
    // -------
    // p-values are symmetric in the statistic and handle degenerate inputs.
    fn two_sided_p_value_properties() {
        let p = two_sided_p_value(2.228_138_851_986, 10).unwrap();
        assert_relative_eq!(p, 0.05, epsilon = 1e-6);
        assert_relative_eq!(two_sided_p_value(-1.3, 5).unwrap(), two_sided_p_value(1.3, 5).unwrap());
        assert_eq!(two_sided_p_value(f64::INFINITY, 5).unwrap(), 0.0);
        assert_eq!(two_sided_p_value(f64::NAN, 5).unwrap(), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Type-7 percentiles interpolate between order statistics.
    //
    // Given
    // -----
    // - Sample 1..=5.
    //
    // Expect
    // ------
    // - 25 % → 2, 10 % → 1.4, 100 % → 5.
    fn percentile_interpolates() {
        let s = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile(&s, 0.25).unwrap(), 2.0);
        assert_relative_eq!(percentile(&s, 0.10).unwrap(), 1.4, epsilon = 1e-12);
        assert_relative_eq!(percentile(&s, 1.0).unwrap(), 5.0);
        assert_eq!(percentile(&[], 0.5).unwrap_err(), InferenceError::EmptySample);
    }

    #[test]
    // Purpose
    // -------
    // A constant sample yields a degenerate interval.
    fn percentile_interval_of_constant_sample() {
        let (lo, hi) = percentile_interval(&[1.5; 50], 0.95).unwrap();
        assert_eq!((lo, hi), (1.5, 1.5));
    }
}
