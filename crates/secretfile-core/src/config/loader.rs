//! Configuration loading.

use super::Config;
use crate::error::ConfigError;
use crate::{env, paths};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve which config file to read.
///
/// An explicit path wins, then `SECRETFILE_CONFIG`, then `~/.secretfile/config.json5`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::get_var(env::vars::SECRETFILE_CONFIG) {
        return Ok(paths::expand_tilde(&path));
    }
    paths::config_file()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    ///
    /// Environment overrides are applied in both cases and the result is validated.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Override fields from `SECRETFILE_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Some(file) = env::get_var(env::vars::SECRETFILE_FILE) {
            self.secrets_file = Some(paths::expand_tilde(&file));
        }
        if let Some(capacity) = env::get_usize(env::vars::SECRETFILE_CACHE_CAPACITY) {
            self.cache.capacity = capacity;
        }
        if let Some(interval) = env::get_u64(env::vars::SECRETFILE_RECHECK_MS) {
            self.cache.recheck_interval_ms = interval;
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.cache.capacity == 0 {
            errors.push("Cache capacity must be at least 1".to_string());
        }

        if let Some(file) = &self.secrets_file {
            if file.as_os_str().is_empty() {
                errors.push("secrets_file must not be blank".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// The secrets file to use when a command does not name one.
    pub fn default_secrets_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.secrets_file {
            Some(path) => Ok(path.clone()),
            None => paths::default_secrets_file(),
        }
    }
}
