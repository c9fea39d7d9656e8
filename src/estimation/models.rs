//! Power-law model forms for the direct estimator.
//!
//! Parameters are stored in the order `[D, a, c]`, keeping only the
//! entries a model has:
//!
//! | model | equation        | θ          |
//! |-------|-----------------|------------|
//! | AD+C  | `y = a·x^D + c` | `[D, a, c]`|
//! | AD    | `y = a·x^D`     | `[D, a]`   |
//! | D+C   | `y = x^D + c`   | `[D, c]`   |
//! | D     | `y = x^D`       | `[D]`      |
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::{EstResult, EstimationError};
use crate::{curve::Sign, optimization::least_squares::Theta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PowerLawModel {
    #[default]
    #[serde(rename = "AD+C")]
    ScaledWithOffset,
    #[serde(rename = "AD")]
    Scaled,
    #[serde(rename = "D+C")]
    WithOffset,
    #[serde(rename = "D")]
    Pure,
}

impl PowerLawModel {
    /// Models in their conventional index order (0..=3).
    pub const ALL: [PowerLawModel; 4] = [
        PowerLawModel::ScaledWithOffset,
        PowerLawModel::Scaled,
        PowerLawModel::WithOffset,
        PowerLawModel::Pure,
    ];

    pub fn from_index(index: usize) -> EstResult<Self> {
        Self::ALL.get(index).copied().ok_or(EstimationError::UnknownName {
            what: "model index",
            name: index.to_string(),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerLawModel::ScaledWithOffset => "AD+C",
            PowerLawModel::Scaled => "AD",
            PowerLawModel::WithOffset => "D+C",
            PowerLawModel::Pure => "D",
        }
    }

    pub fn has_scale(self) -> bool {
        matches!(self, PowerLawModel::ScaledWithOffset | PowerLawModel::Scaled)
    }

    pub fn has_offset(self) -> bool {
        matches!(self, PowerLawModel::ScaledWithOffset | PowerLawModel::WithOffset)
    }

    pub fn param_count(self) -> usize {
        1 + usize::from(self.has_scale()) + usize::from(self.has_offset())
    }

    /// Sign −1 curves always keep the scale factor.
    pub fn check_sign(self, sign: Sign) -> EstResult<()> {
        if sign == Sign::Negative && !self.has_scale() {
            return Err(EstimationError::ModelRequiresScale { model: self.name() });
        }
        Ok(())
    }

    /// Seed `D = sign`, `a = first range value`, `c = 0`.
    pub fn initial_guess(self, sign: Sign, first_value: f64) -> Theta {
        let mut theta = vec![sign.value()];
        if self.has_scale() {
            theta.push(first_value);
        }
        if self.has_offset() {
            theta.push(0.0);
        }
        Array1::from(theta)
    }

    /// `(D, a, c)` from a parameter vector of this model.
    #[inline]
    pub fn unpack(self, theta: &Theta) -> (f64, f64, f64) {
        let d = theta[0];
        let a = if self.has_scale() { theta[1] } else { 1.0 };
        let c = if self.has_offset() { theta[self.param_count() - 1] } else { 0.0 };
        (d, a, c)
    }

    /// Model value at scale `x`.
    #[inline]
    pub fn value(self, theta: &Theta, x: f64) -> f64 {
        let (d, a, c) = self.unpack(theta);
        a * x.powf(d) + c
    }

    /// `∂y/∂θ` at scale `x`, in parameter order.
    pub fn gradient(self, theta: &Theta, x: f64) -> Array1<f64> {
        let (d, a, _) = self.unpack(theta);
        let xd = x.powf(d);
        let mut grad = Vec::with_capacity(self.param_count());
        grad.push(a * xd * x.ln());
        if self.has_scale() {
            grad.push(xd);
        }
        if self.has_offset() {
            grad.push(1.0);
        }
        Array1::from(grad)
    }
}

impl FromStr for PowerLawModel {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.to_ascii_uppercase().as_str() {
            "AD+C" | "0" => Ok(PowerLawModel::ScaledWithOffset),
            "AD" | "1" => Ok(PowerLawModel::Scaled),
            "D+C" | "2" => Ok(PowerLawModel::WithOffset),
            "D" | "3" => Ok(PowerLawModel::Pure),
            _ => Err(EstimationError::UnknownName { what: "model", name: s.to_string() }),
        }
    }
}
