use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "FORMPIPE_PROXY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/formpipe-proxy.toml";
const ENV_PREFIX: &str = "FORMPIPE_PROXY";
const ENV_SEPARATOR: &str = "__";
const BACKEND_TOKEN_ENV_VAR: &str = "FORMPIPE_BACKEND_TOKEN";

/// Resolve the config file path: explicit argument, then `FORMPIPE_PROXY_CONFIG`,
/// then the default location
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration with priority (lowest to highest):
/// struct defaults, TOML file, `.env` file, process environment
pub fn load(explicit_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let mut config = load_from_sources(config_path(explicit_path))?;
    load_secrets(&mut config);

    Ok(config)
}

/// Secrets never come from the TOML file
fn load_secrets(config: &mut Config) {
    if let Ok(token) = env::var(BACKEND_TOKEN_ENV_VAR) {
        if !token.is_empty() {
            config.backend.token = Some(token);
        }
    }
}

/// Load configuration from a specific file plus environment overrides
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // FORMPIPE_PROXY__BACKEND__BASE_URL -> backend.base_url
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_wins() {
        let path = config_path(Some(PathBuf::from("/etc/proxy.toml")));
        assert_eq!(path, PathBuf::from("/etc/proxy.toml"));
    }

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.backend.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("proxy.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9100"
max_payload_bytes = "128MB"

[backend]
base_url = "https://lta.example.org/services"
finalize_path = "/v2/apply"
request_timeout_secs = 60

[logging]
format = "json"
error_log_dir = "/var/log/formpipe-proxy"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9100");
        assert_eq!(config.server.max_payload_bytes.as_u64(), 128 * 1024 * 1024);
        assert_eq!(config.backend.base_url, "https://lta.example.org/services");
        assert_eq!(config.backend.finalize_path, "/v2/apply");
        assert_eq!(config.backend.stage_metadata_path, "/import/metadata-file");
        assert_eq!(config.backend.request_timeout_secs, 60);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.logging.error_log_dir,
            Some(PathBuf::from("/var/log/formpipe-proxy"))
        );
    }
}
