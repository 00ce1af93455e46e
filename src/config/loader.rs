//! Configuration loading from disk and environment.

use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, API_BASE_URL_ENV};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// The `API_BASE_URL` environment variable, when set and non-empty, takes
/// precedence over the file's upstream base URL.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    finalize(config)
}

/// Produce a default configuration, still honoring the environment override.
pub fn default_config() -> Result<GatewayConfig, ConfigError> {
    finalize(GatewayConfig::default())
}

fn finalize(mut config: GatewayConfig) -> Result<GatewayConfig, ConfigError> {
    if let Ok(base) = std::env::var(API_BASE_URL_ENV) {
        if !base.is_empty() {
            config.upstream.base_url = base;
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
