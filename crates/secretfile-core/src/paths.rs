//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the secretfile base directory (~/.secretfile).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".secretfile"))
}

/// Get the main config file path (~/.secretfile/config.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("config.json5"))
}

/// Get the default secrets file path (~/.secretfile/secrets.json).
pub fn default_secrets_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("secrets.json"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
