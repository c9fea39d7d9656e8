//! Progression kinds and the default-max heuristic.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::SamplingError;
use crate::geometry::Envelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sequence {
    #[default]
    Geometric,
    Arithmetic,
}

impl Sequence {
    #[inline]
    pub fn step(self, value: f64, coef: f64) -> f64 {
        match self {
            Sequence::Geometric => value * coef,
            Sequence::Arithmetic => value + coef,
        }
    }
}

impl FromStr for Sequence {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geom" | "geometric" => Ok(Sequence::Geometric),
            "arith" | "arithmetic" => Ok(Sequence::Arithmetic),
            other => Err(SamplingError::UnknownSequence { name: other.to_string() }),
        }
    }
}

/// How a zero `max_size` is resolved from the dataset envelope.
///
/// Single-fractal methods stop at half the smaller envelope side. Box
/// counting and multifractal moments go up to the larger side so that the
/// coarsest grids still have several partitions to average over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxHeuristic {
    #[default]
    HalfMinDimension,
    MaxDimension,
}

impl MaxHeuristic {
    pub fn default_max(self, envelope: &Envelope) -> f64 {
        match self {
            MaxHeuristic::HalfMinDimension => 0.5 * envelope.min_dimension(),
            MaxHeuristic::MaxDimension => envelope.max_dimension(),
        }
    }
}
