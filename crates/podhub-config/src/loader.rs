//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator, SecurityConfig};
use config::{Config, Environment, File};
use podhub_core::{PodhubError, PodhubResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loads [`AppConfig`] from a config directory plus the process environment.
///
/// Sources are applied in order, later ones winning:
/// 1. `{dir}/default.toml`
/// 2. `{dir}/{environment}.toml`
/// 3. `{dir}/local.toml` (not committed to version control)
/// 4. Environment variables prefixed `PODHUB__`, nested with `__`
///    (e.g. `PODHUB__CACHE__DEFAULT_TTL_MINUTES=10`)
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: String,
}

impl ConfigLoader {
    /// Creates a loader for `config_dir`, taking the environment name from
    /// `PODHUB_ENVIRONMENT` (default `development`).
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }
        let environment =
            std::env::var("PODHUB_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        Self::with_environment(config_dir, environment)
    }

    /// Creates a loader with an explicit environment name.
    pub fn with_environment(
        config_dir: impl Into<PathBuf>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            config_dir: config_dir.into(),
            environment: environment.into(),
        }
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Builds, deserializes and validates the configuration.
    pub fn load(&self) -> PodhubResult<AppConfig> {
        info!(environment = %self.environment, "Loading configuration");

        let mut builder = Config::builder()
            .set_default("app.environment", self.environment.clone())
            .map_err(|e| PodhubError::Configuration(e.to_string()))?;

        for name in ["default", self.environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config file: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("PODHUB")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| PodhubError::Configuration(e.to_string()))?;

        Self::validate_config(&app_config)?;
        Ok(app_config)
    }

    /// Returns the directory this loader reads from.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn validate_config(config: &AppConfig) -> PodhubResult<()> {
        if config.app.environment == "production"
            && config.security.jwt_secret == SecurityConfig::default().jwt_secret
        {
            warn!("Using default JWT secret in production! This is a security risk.");
        }

        ConfigValidator::validate(config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            PodhubError::Configuration(message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheBackend;
    use std::fs;

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::with_environment(dir.path().join("nope"), "test")
            .load()
            .unwrap();
        assert_eq!(config.cache.default_ttl_minutes, 5);
        assert_eq!(config.app.environment, "test");
    }

    #[test]
    fn test_environment_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[cache]\nbackend = \"memory\"\n[server]\nhost = \"127.0.0.1\"\nport = 9000\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[cache]\nbackend = \"memory\"\ndefault_ttl_minutes = 15\n",
        )
        .unwrap();

        let config = ConfigLoader::with_environment(dir.path(), "staging")
            .load()
            .unwrap();
        assert_eq!(config.cache.default_ttl_minutes, 15);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[cache]\nbackend = \"memory\"\ndefault_ttl_minutes = 0\n",
        )
        .unwrap();

        let err = ConfigLoader::with_environment(dir.path(), "test")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("cache.default_ttl_minutes"));
    }
}
