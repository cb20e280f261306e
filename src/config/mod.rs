//! Configuration management for the import proxy
//!
//! Settings are layered (lowest to highest priority):
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Environment Variables
//!
//! Any key can be overridden with `FORMPIPE_PROXY__<section>__<key>`:
//! - `FORMPIPE_PROXY__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `FORMPIPE_PROXY__BACKEND__BASE_URL=https://lta.internal`
//! - `FORMPIPE_PROXY__LOGGING__FORMAT=json`
//!
//! The backend bearer token is read only from `FORMPIPE_BACKEND_TOKEN`.
//!
//! # Configuration File
//!
//! Loaded from `config/formpipe-proxy.toml` unless `--config` or the
//! `FORMPIPE_PROXY_CONFIG` environment variable names another file.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{BackendConfig, Config, LogFormat, LoggingConfig, ServerConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// `path` overrides the file location; otherwise `FORMPIPE_PROXY_CONFIG`
    /// or the default path is used.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path without `.env` or secrets
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
