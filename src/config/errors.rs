//! Errors for configuration loading and validation.
use crate::optimization::errors::OptError;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    // ---- Loading ----
    /// File could not be read.
    Io { path: String, text: String },
    /// Document is not valid JSON for the target type.
    Parse { text: String, line: usize, column: usize },

    // ---- Validation ----
    /// Field outside its domain.
    InvalidValue { field: &'static str, value: f64, reason: &'static str },
    /// Optimizer options rejected.
    Optimizer(OptError),
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Loading ----
            ConfigError::Io { path, text } => write!(f, "Cannot read '{path}': {text}"),
            ConfigError::Parse { text, line, column } => {
                write!(f, "Invalid configuration at line {line}, column {column}: {text}")
            }

            // ---- Validation ----
            ConfigError::InvalidValue { field, value, reason } => {
                write!(f, "Invalid {field} = {value}: {reason}")
            }
            ConfigError::Optimizer(err) => write!(f, "{err}"),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse { text: err.to_string(), line: err.line(), column: err.column() }
    }
}

impl From<OptError> for ConfigError {
    fn from(err: OptError) -> Self {
        ConfigError::Optimizer(err)
    }
}
