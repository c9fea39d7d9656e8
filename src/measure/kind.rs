//! Strategy selection and dispatch.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{
    box_counting::{BoxCountingOptions, box_counting},
    correlation::{raster_correlation, vector_correlation},
    dilation::{DilationOptions, raster_dilation, vector_dilation},
    errors::{MeasureError, MeasureResult},
    radial::{RadialOptions, radial},
};
use crate::{
    curve::{Curve, Monotonicity, Sign},
    execution::ExecContext,
    geometry::Dataset,
    sampling::{MaxHeuristic, Sampling},
};

/// MeasureKind — which quantity is measured per scale, with its options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MeasureKind {
    BoxCounting(BoxCountingOptions),
    Dilation(DilationOptions),
    Correlation,
    Radial(RadialOptions),
}

impl MeasureKind {
    pub fn name(&self) -> &'static str {
        match self {
            MeasureKind::BoxCounting(_) => "box counting",
            MeasureKind::Dilation(_) => "dilation",
            MeasureKind::Correlation => "correlation",
            MeasureKind::Radial(_) => "radial",
        }
    }

    pub fn sign(&self) -> Sign {
        match self {
            MeasureKind::BoxCounting(_) => Sign::Negative,
            _ => Sign::Positive,
        }
    }

    pub fn monotonicity(&self) -> Monotonicity {
        match self {
            MeasureKind::BoxCounting(_) => Monotonicity::NonIncreasing,
            _ => Monotonicity::NonDecreasing,
        }
    }

    /// Default-max heuristic for this strategy.
    pub fn max_heuristic(&self) -> MaxHeuristic {
        match self {
            MeasureKind::BoxCounting(_) => MaxHeuristic::MaxDimension,
            _ => MaxHeuristic::HalfMinDimension,
        }
    }

    /// Whether raster input needs pixel-snapped sampling.
    pub fn needs_discrete_raster_sampling(&self) -> bool {
        matches!(self, MeasureKind::Dilation(_) | MeasureKind::Correlation)
    }
}

impl FromStr for MeasureKind {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "box" | "boxcounting" | "box_counting" => Ok(MeasureKind::BoxCounting(Default::default())),
            "dilation" => Ok(MeasureKind::Dilation(Default::default())),
            "correlation" => Ok(MeasureKind::Correlation),
            "radial" => Ok(MeasureKind::Radial(Default::default())),
            other => Err(MeasureError::UnknownMethod { name: other.to_string() }),
        }
    }
}

/// Run `kind` on `dataset` over `sampling`.
///
/// Errors
/// ------
/// - `Unsupported` for dilation on a vector layer without a buffer oracle.
/// - Strategy errors as documented on each strategy.
pub fn compute_curve(
    kind: &MeasureKind, dataset: Dataset<'_>, sampling: &Sampling, ctx: &ExecContext,
) -> MeasureResult<Curve> {
    match (kind, dataset) {
        (MeasureKind::BoxCounting(opts), _) => box_counting(dataset, sampling, opts, ctx),
        (MeasureKind::Dilation(opts), Dataset::Raster(raster)) => {
            raster_dilation(raster, sampling, opts, ctx)
        }
        (MeasureKind::Dilation(opts), Dataset::Vector(set)) => {
            if set.is_empty() {
                return Err(MeasureError::EmptyDataset);
            }
            let oracle = set
                .buffer_oracle()
                .ok_or(MeasureError::Unsupported { measure: "dilation", dataset: "unbuffered vector" })?;
            vector_dilation(oracle, sampling, opts, ctx)
        }
        (MeasureKind::Correlation, Dataset::Raster(raster)) => {
            raster_correlation(raster, sampling, ctx)
        }
        (MeasureKind::Correlation, Dataset::Vector(set)) => vector_correlation(set, sampling, ctx),
        (MeasureKind::Radial(opts), _) => radial(dataset, sampling, opts, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::PointSet, sampling::Sequence};

    #[test]
    // Purpose
    // -------
    // Dilation on a vector layer that cannot buffer itself is a
    // configuration error.
    fn compute_curve_rejects_unbuffered_vector_dilation() {
        // Arrange
        let pts = PointSet::new(vec![[0.0, 0.0], [1.0, 1.0]]).expect("valid points");
        let sampling = Sampling::new(1.0, 4.0, 2.0, Sequence::Geometric).expect("valid sampling");
        let ctx = ExecContext::sequential().expect("pool should build");
        let kind = MeasureKind::Dilation(Default::default());

        // Act
        let err = compute_curve(&kind, Dataset::Vector(&pts), &sampling, &ctx).unwrap_err();

        // Assert
        assert_eq!(err.kind(), crate::errors::ErrorKind::Configuration);
    }

    #[test]
    // Purpose
    // -------
    // Signs, directions and heuristics follow the measured quantity.
    fn measure_kind_metadata() {
        let boxes: MeasureKind = "box".parse().expect("known method");
        assert_eq!(boxes.sign(), Sign::Negative);
        assert_eq!(boxes.max_heuristic(), MaxHeuristic::MaxDimension);
        assert_eq!(MeasureKind::Correlation.monotonicity(), Monotonicity::NonDecreasing);
        assert!(MeasureKind::Correlation.needs_discrete_raster_sampling());
        assert!("nope".parse::<MeasureKind>().is_err());
    }
}
