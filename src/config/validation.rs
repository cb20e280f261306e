use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Backend base_url '{0}' must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Backend path '{field}' must start with '/': {value}")]
    InvalidEndpointPath { field: &'static str, value: String },

    #[error("Timeout must be positive: {field} = {value}")]
    InvalidTimeout { field: &'static str, value: u64 },

    #[error("max_payload_bytes must be positive")]
    InvalidPayloadLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_backend(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_payload_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidPayloadLimit);
    }
    Ok(())
}

fn validate_backend(config: &Config) -> Result<(), ValidationError> {
    let backend = &config.backend;

    if !backend.base_url.starts_with("http://") && !backend.base_url.starts_with("https://") {
        return Err(ValidationError::InvalidBaseUrl(backend.base_url.clone()));
    }

    for (field, value) in [
        ("stage_object_path", &backend.stage_object_path),
        ("stage_metadata_path", &backend.stage_metadata_path),
        ("finalize_path", &backend.finalize_path),
    ] {
        if !value.starts_with('/') {
            return Err(ValidationError::InvalidEndpointPath {
                field,
                value: value.clone(),
            });
        }
    }

    for (field, value) in [
        ("connect_timeout_secs", backend.connect_timeout_secs),
        ("request_timeout_secs", backend.request_timeout_secs),
    ] {
        if value == 0 {
            return Err(ValidationError::InvalidTimeout { field, value });
        }
    }

    Ok(())
}
