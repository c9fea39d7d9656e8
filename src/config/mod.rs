//! config — typed configuration for measurement and estimation runs.
//!
//! Purpose
//! -------
//! Replace string-keyed parameter maps with one serde struct per method.
//! Front-ends build these directly or load them from JSON with
//! [`load_config`]; the core never parses `key=value` text.
//!
//! Conventions
//! -----------
//! - Every struct is `#[serde(default)]`, so documents only list what they
//!   change.
//! - Sampling bounds of 0 are resolved against the dataset at run time.
//! - Validation happens when estimators are built
//!   ([`EstimationConfig::build_estimator`]), before any measurement.

pub mod errors;
pub mod io;
pub mod methods;

pub use self::{
    errors::{ConfigError, ConfigResult},
    io::{load_config, parse_config},
    methods::{
        BoxCountingConfig, CorrelationConfig, DilationConfig, EstimationConfig, MethodConfig,
        MultifractalConfig, RadialConfig,
    },
};
