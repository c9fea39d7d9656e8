//! Estimator selection.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::EstimationError;
use crate::sampling::Sequence;

/// Default bootstrap iterations for the log estimator.
pub const LOG_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Default bootstrap iterations for the direct estimator; each iteration is
/// a full non-linear fit.
pub const DIRECT_BOOTSTRAP_ITERATIONS: usize = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// OLS of `ln y` on `ln x`.
    Log,
    /// Levenberg–Marquardt fit of a power-law model on raw values.
    Direct,
}

impl EstimatorKind {
    /// Linear spacing favours the direct fit; geometric spacing the log fit.
    pub fn default_for(sequence: Sequence) -> Self {
        match sequence {
            Sequence::Arithmetic => EstimatorKind::Direct,
            Sequence::Geometric => EstimatorKind::Log,
        }
    }

    pub fn default_bootstrap_iterations(self) -> usize {
        match self {
            EstimatorKind::Log => LOG_BOOTSTRAP_ITERATIONS,
            EstimatorKind::Direct => DIRECT_BOOTSTRAP_ITERATIONS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EstimatorKind::Log => "log",
            EstimatorKind::Direct => "direct",
        }
    }
}

impl FromStr for EstimatorKind {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" | "loglog" | "log-log" => Ok(EstimatorKind::Log),
            "direct" | "nonlinear" | "non-linear" => Ok(EstimatorKind::Direct),
            other => Err(EstimationError::UnknownName { what: "estimator", name: other.to_string() }),
        }
    }
}
