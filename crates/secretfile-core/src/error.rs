//! Error types for secretfile core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from locating, reading, or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The config file parsed, but its values are unusable.
    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Config file is not valid JSON5: {0}")]
    Json5(String),

    /// No home directory, so default paths cannot be resolved.
    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
