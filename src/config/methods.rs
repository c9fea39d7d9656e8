//! Typed per-method configuration.
use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use crate::{
    estimation::{BootstrapOptions, Estimator, EstimatorKind, PowerLawModel, make_estimator},
    inference::DEFAULT_CONFIDENCE,
    measure::{BoxCountingOptions, DilationOptions, MeasureKind, RadialOptions},
    multifractal::default_q_values,
    optimization::least_squares::{LmOptions, Tolerances},
    sampling::{MaxHeuristic, SamplingOptions, Sequence},
};

fn check_level(field: &'static str, level: f64) -> ConfigResult<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value: level, reason: "must lie in (0, 1)" })
    }
}

/// EstimationConfig — estimator choice and optimizer/bootstrap settings.
///
/// Fields
/// ------
/// - `estimator`: `None` picks direct for arithmetic sampling and log for
///   geometric sampling.
/// - `model`: direct estimator only.
/// - `level`: analytic interval confidence level.
/// - `tol_grad`, `tol_cost`, `max_iter`, `initial_lambda`: Levenberg–Marquardt
///   stopping rules and starting damping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    pub estimator: Option<EstimatorKind>,
    pub model: PowerLawModel,
    pub level: f64,
    pub bootstrap: BootstrapOptions,
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
    pub initial_lambda: f64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        let lm = LmOptions::default();
        Self {
            estimator: None,
            model: PowerLawModel::default(),
            level: DEFAULT_CONFIDENCE,
            bootstrap: BootstrapOptions::default(),
            tol_grad: lm.tols.tol_grad,
            tol_cost: lm.tols.tol_cost,
            max_iter: lm.tols.max_iter,
            initial_lambda: lm.initial_lambda,
        }
    }
}

impl EstimationConfig {
    pub fn estimator_kind(&self, sequence: Sequence) -> EstimatorKind {
        self.estimator.unwrap_or_else(|| EstimatorKind::default_for(sequence))
    }

    /// Validated optimizer options.
    pub fn lm_options(&self) -> ConfigResult<LmOptions> {
        let tols = Tolerances::new(self.tol_grad, self.tol_cost, self.max_iter)?;
        Ok(LmOptions::new(tols, self.initial_lambda)?)
    }

    /// Reject out-of-domain levels and optimizer settings.
    pub fn validate(&self) -> ConfigResult<()> {
        check_level("level", self.level)?;
        check_level("bootstrap.level", self.bootstrap.level)?;
        self.lm_options().map(|_| ())
    }

    /// Estimator for a sampling built with `sequence`.
    pub fn build_estimator(&self, sequence: Sequence) -> ConfigResult<Box<dyn Estimator>> {
        self.validate()?;
        Ok(make_estimator(self.estimator_kind(sequence), self.model, self.lm_options()?, self.level))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxCountingConfig {
    pub sampling: SamplingOptions,
    /// Gliding factor; `<= 1` disables gliding.
    pub gliding: f64,
    pub estimation: EstimationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DilationConfig {
    pub sampling: SamplingOptions,
    pub stop_on_single_component: bool,
    pub estimation: EstimationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    pub sampling: SamplingOptions,
    pub estimation: EstimationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    pub sampling: SamplingOptions,
    /// Measurement centre; the envelope centre when absent.
    pub center: Option<[f64; 2]>,
    pub estimation: EstimationConfig,
}

/// MultifractalConfig — q set and optional fitting range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultifractalConfig {
    pub sampling: SamplingOptions,
    pub q_values: Vec<f64>,
    /// Inclusive `[low, high]`, snapped onto the measured scales.
    pub range: Option<(f64, f64)>,
    pub level: f64,
}

impl Default for MultifractalConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingOptions::default(),
            q_values: default_q_values(),
            range: None,
            level: DEFAULT_CONFIDENCE,
        }
    }
}

impl MultifractalConfig {
    /// Sampling options with the box-grid default max (larger envelope side)
    /// filled in when the document leaves the heuristic unset.
    pub fn sampling_options(&self) -> SamplingOptions {
        self.sampling.or_heuristic(MaxHeuristic::MaxDimension)
    }
}

/// MethodConfig — one measurement method with its settings, tagged by
/// `"method"` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MethodConfig {
    BoxCounting(BoxCountingConfig),
    Dilation(DilationConfig),
    Correlation(CorrelationConfig),
    Radial(RadialConfig),
    Multifractal(MultifractalConfig),
}

impl MethodConfig {
    pub fn sampling(&self) -> &SamplingOptions {
        match self {
            MethodConfig::BoxCounting(c) => &c.sampling,
            MethodConfig::Dilation(c) => &c.sampling,
            MethodConfig::Correlation(c) => &c.sampling,
            MethodConfig::Radial(c) => &c.sampling,
            MethodConfig::Multifractal(c) => &c.sampling,
        }
    }

    pub fn sampling_mut(&mut self) -> &mut SamplingOptions {
        match self {
            MethodConfig::BoxCounting(c) => &mut c.sampling,
            MethodConfig::Dilation(c) => &mut c.sampling,
            MethodConfig::Correlation(c) => &mut c.sampling,
            MethodConfig::Radial(c) => &mut c.sampling,
            MethodConfig::Multifractal(c) => &mut c.sampling,
        }
    }

    /// Strategy to run for single-curve methods; `None` for multifractal.
    pub fn measure_kind(&self) -> Option<MeasureKind> {
        match self {
            MethodConfig::BoxCounting(c) => {
                Some(MeasureKind::BoxCounting(BoxCountingOptions::with_gliding(c.gliding)))
            }
            MethodConfig::Dilation(c) => Some(MeasureKind::Dilation(DilationOptions {
                stop_on_single_component: c.stop_on_single_component,
            })),
            MethodConfig::Correlation(_) => Some(MeasureKind::Correlation),
            MethodConfig::Radial(c) => Some(MeasureKind::Radial(RadialOptions { center: c.center })),
            MethodConfig::Multifractal(_) => None,
        }
    }

    /// Estimation settings for single-curve methods.
    pub fn estimation(&self) -> Option<&EstimationConfig> {
        match self {
            MethodConfig::BoxCounting(c) => Some(&c.estimation),
            MethodConfig::Dilation(c) => Some(&c.estimation),
            MethodConfig::Correlation(c) => Some(&c.estimation),
            MethodConfig::Radial(c) => Some(&c.estimation),
            MethodConfig::Multifractal(_) => None,
        }
    }

    pub fn estimation_mut(&mut self) -> Option<&mut EstimationConfig> {
        match self {
            MethodConfig::BoxCounting(c) => Some(&mut c.estimation),
            MethodConfig::Dilation(c) => Some(&mut c.estimation),
            MethodConfig::Correlation(c) => Some(&mut c.estimation),
            MethodConfig::Radial(c) => Some(&mut c.estimation),
            MethodConfig::Multifractal(_) => None,
        }
    }

    /// Default configuration for a method name (`box`, `dilation`,
    /// `correlation`, `radial`, `multifractal`).
    pub fn for_method(name: &str) -> Option<Self> {
        let config = match name.trim().to_ascii_lowercase().as_str() {
            "box" | "boxcounting" | "box_counting" => MethodConfig::BoxCounting(Default::default()),
            "dilation" => MethodConfig::Dilation(Default::default()),
            "correlation" => MethodConfig::Correlation(Default::default()),
            "radial" => MethodConfig::Radial(Default::default()),
            "multifractal" => MethodConfig::Multifractal(Default::default()),
            _ => return None,
        };
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::io::parse_config;

    #[test]
    // Purpose
    // -------
    // A sparse JSON document fills every omitted field with its default.
    //
    // Given
    // -----
    // - `{"method": "box_counting", "gliding": 3, "sampling": {"coef": 2}}`.
    //
    // Expect
    // ------
    // - Box counting with gliding 3, heuristic left to the method, default
    //   estimation settings.
    fn method_config_parses_sparse_json() {
        // Act
        let config: MethodConfig =
            parse_config(r#"{"method": "box_counting", "gliding": 3, "sampling": {"coef": 2}}"#)
                .expect("valid config");

        // Assert
        let MethodConfig::BoxCounting(box_config) = &config else {
            panic!("expected box counting, got {config:?}");
        };
        assert_eq!(box_config.gliding, 3.0);
        assert_eq!(box_config.sampling.heuristic, None);
        assert_eq!(box_config.estimation, EstimationConfig::default());
        assert_eq!(
            config.measure_kind(),
            Some(MeasureKind::BoxCounting(BoxCountingOptions::with_gliding(3.0)))
        );
    }

    #[test]
    // Purpose
    // -------
    // A multifractal document with a partial sampling object still grids up
    // to the larger envelope side, unless it names a heuristic itself.
    fn multifractal_config_keeps_max_dimension_default() {
        // Act
        let sparse: MultifractalConfig =
            parse_config(r#"{"sampling": {"coef": 2}}"#).expect("valid config");
        let explicit: MultifractalConfig =
            parse_config(r#"{"sampling": {"heuristic": "half_min_dimension"}}"#)
                .expect("valid config");

        // Assert
        assert_eq!(sparse.sampling_options().heuristic, Some(MaxHeuristic::MaxDimension));
        assert_eq!(explicit.sampling_options().heuristic, Some(MaxHeuristic::HalfMinDimension));
    }

    #[test]
    // Purpose
    // -------
    // The estimator follows the sequence unless set explicitly.
    fn estimation_config_defaults_follow_sequence() {
        // Arrange
        let auto = EstimationConfig::default();
        let forced = EstimationConfig { estimator: Some(EstimatorKind::Log), ..auto };

        // Act / Assert
        assert_eq!(auto.estimator_kind(Sequence::Arithmetic), EstimatorKind::Direct);
        assert_eq!(auto.estimator_kind(Sequence::Geometric), EstimatorKind::Log);
        assert_eq!(forced.estimator_kind(Sequence::Arithmetic), EstimatorKind::Log);
        assert_eq!(auto.build_estimator(Sequence::Arithmetic).expect("valid").kind(), EstimatorKind::Direct);
    }

    #[test]
    // Purpose
    // -------
    // Invalid levels and optimizer settings are configuration errors.
    fn estimation_config_validation() {
        let bad_level = EstimationConfig { level: 1.5, ..Default::default() };
        let bad_lambda = EstimationConfig { initial_lambda: -1.0, ..Default::default() };
        assert!(matches!(bad_level.validate(), Err(ConfigError::InvalidValue { field: "level", .. })));
        assert!(matches!(bad_lambda.validate(), Err(ConfigError::Optimizer(_))));
    }
}
