//! Input checks shared by [`Sampling`](super::Sampling) constructors.
use super::{
    errors::{SamplingError, SamplingResult},
    sequence::Sequence,
};

pub fn validate_bounds(min_size: f64, max_size: f64) -> SamplingResult<()> {
    if !min_size.is_finite() || min_size <= 0.0 {
        return Err(SamplingError::InvalidMinSize { value: min_size });
    }
    if !max_size.is_finite() || max_size <= 0.0 {
        return Err(SamplingError::InvalidMaxSize { value: max_size });
    }
    if min_size > max_size {
        return Err(SamplingError::MinExceedsMax { min: min_size, max: max_size });
    }
    Ok(())
}

pub fn validate_coef(coef: f64, sequence: Sequence) -> SamplingResult<()> {
    match sequence {
        Sequence::Geometric if !(coef.is_finite() && coef > 1.0) => {
            Err(SamplingError::InvalidCoefficient { coef, reason: "geometric sequences need coef > 1" })
        }
        Sequence::Arithmetic if !(coef.is_finite() && coef > 0.0) => {
            Err(SamplingError::InvalidCoefficient { coef, reason: "arithmetic sequences need coef > 0" })
        }
        _ => Ok(()),
    }
}

pub fn validate_resolution(resolution: f64) -> SamplingResult<()> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(SamplingError::InvalidResolution { value: resolution });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Bound checks reject non-positive, non-finite and inverted bounds.
    fn validate_bounds_rejects_bad_input() {
        assert!(validate_bounds(1.0, 10.0).is_ok());
        assert!(validate_bounds(3.0, 3.0).is_ok());
        assert_eq!(validate_bounds(0.0, 10.0), Err(SamplingError::InvalidMinSize { value: 0.0 }));
        assert!(matches!(
            validate_bounds(1.0, f64::INFINITY),
            Err(SamplingError::InvalidMaxSize { .. })
        ));
        assert_eq!(
            validate_bounds(10.0, 1.0),
            Err(SamplingError::MinExceedsMax { min: 10.0, max: 1.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // The coefficient rule depends on the progression kind.
    fn validate_coef_depends_on_sequence() {
        assert!(validate_coef(1.0, Sequence::Geometric).is_err());
        assert!(validate_coef(1.5, Sequence::Geometric).is_ok());
        assert!(validate_coef(0.0, Sequence::Arithmetic).is_err());
        assert!(validate_coef(0.5, Sequence::Arithmetic).is_ok());
        assert!(validate_coef(f64::NAN, Sequence::Arithmetic).is_err());
    }
}
