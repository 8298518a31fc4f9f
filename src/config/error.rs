//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use super::ConfigDiagnostics;
use crate::error::InjectError;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Inject(#[from] InjectError),

    // No #[from]: source() would print the diagnostics twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}
