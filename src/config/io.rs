//! JSON loading for configuration structs.
use std::{fs, path::Path};

use log::debug;
use serde::de::DeserializeOwned;

use super::errors::{ConfigError, ConfigResult};

/// Parse a configuration document.
pub fn parse_config<T: DeserializeOwned>(text: &str) -> ConfigResult<T> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a JSON configuration file.
///
/// # Errors
/// `Io` when the file cannot be read, `Parse` with the line/column of the
/// first syntax or type error.
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> ConfigResult<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.display().to_string(),
        text: err.to_string(),
    })?;
    debug!("config: loaded {} bytes from {}", text.len(), path.display());
    parse_config(&text)
}
