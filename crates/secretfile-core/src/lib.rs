//! # secretfile-core
//!
//! Shared configuration and utilities for secretfile.
//!
//! - **Configuration**: loading, validation, and persistence of the config file
//! - **Paths**: resolution of the default config and secrets file locations
//! - **Environment**: typed access to `SECRETFILE_*` overrides

pub mod config;
pub mod env;
pub mod error;
pub mod paths;

// Re-exports for convenience
pub use config::Config;
pub use error::ConfigError;
