//! Configuration validation.
//!
//! Collects every problem in one pass so startup fails with the full list
//! instead of one error at a time.

use crate::{AppConfig, CacheBackend};
use thiserror::Error;
use url::Url;

/// A single invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("JWT secret too short: {actual} characters (minimum {minimum})")]
    JwtSecretTooShort { actual: usize, minimum: usize },

    #[error("Invalid port for {name}: {value}")]
    InvalidPort { name: &'static str, value: u16 },

    #[error("Invalid pool size: min ({min}) greater than max ({max})")]
    InvalidPoolSize { min: u32, max: u32 },

    #[error("Invalid {url_type} URL: {message}")]
    InvalidUrl {
        url_type: &'static str,
        message: String,
    },

    #[error("{name} must be greater than zero")]
    NonPositive { name: &'static str },

    #[error("Invalid log level: '{value}' (valid: trace, debug, info, warn, error)")]
    InvalidLogLevel { value: String },

    #[error("Cache backend 'redis' requires redis.enabled = true")]
    RedisBackendDisabled,
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    const MIN_JWT_SECRET_LENGTH: usize = 32;
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_security(config, &mut errors);
        Self::validate_server(config, &mut errors);
        Self::validate_database(config, &mut errors);
        Self::validate_cache(config, &mut errors);

        if config.rate_limit.enabled && config.rate_limit.requests_per_minute == 0 {
            errors.push(ConfigValidationError::NonPositive {
                name: "rate_limit.requests_per_minute",
            });
        }

        let level = config.observability.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.observability.log_level.clone(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_security(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let security = &config.security;
        if security.jwt_secret.len() < Self::MIN_JWT_SECRET_LENGTH {
            errors.push(ConfigValidationError::JwtSecretTooShort {
                actual: security.jwt_secret.len(),
                minimum: Self::MIN_JWT_SECRET_LENGTH,
            });
        }
        if security.jwt_access_expiration_secs == 0 {
            errors.push(ConfigValidationError::NonPositive {
                name: "security.jwt_access_expiration_secs",
            });
        }
        if security.reset_token_ttl_minutes == 0 {
            errors.push(ConfigValidationError::NonPositive {
                name: "security.reset_token_ttl_minutes",
            });
        }
        if security.password_hash_cost == 0 {
            errors.push(ConfigValidationError::NonPositive {
                name: "security.password_hash_cost",
            });
        }
    }

    fn validate_server(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.server.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "server.port",
                value: 0,
            });
        }
        if config.server.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositive {
                name: "server.request_timeout_secs",
            });
        }
    }

    fn validate_database(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let database = &config.database;
        match Url::parse(&database.url) {
            Ok(url) if url.scheme() == "mysql" => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database",
                message: format!("unsupported scheme '{}', expected mysql", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database",
                message: e.to_string(),
            }),
        }
        if database.min_connections > database.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: database.min_connections,
                max: database.max_connections,
            });
        }
        if database.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositive {
                name: "database.connect_timeout_secs",
            });
        }
    }

    fn validate_cache(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.cache.default_ttl_minutes == 0 {
            errors.push(ConfigValidationError::NonPositive {
                name: "cache.default_ttl_minutes",
            });
        }
        if config.cache.backend != CacheBackend::Redis {
            return;
        }
        if !config.redis.enabled {
            errors.push(ConfigValidationError::RedisBackendDisabled);
            return;
        }
        match Url::parse(&config.redis.url) {
            Ok(url) if matches!(url.scheme(), "redis" | "rediss") => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis",
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis",
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.security.jwt_secret = "short".into();
        config.cache.default_ttl_minutes = 0;
        config.database.url = "postgres://localhost/podhub".into();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigValidationError::NonPositive {
            name: "cache.default_ttl_minutes"
        }));
    }

    #[test]
    fn test_redis_backend_requires_redis() {
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(errors, vec![ConfigValidationError::RedisBackendDisabled]);

        config.cache.backend = CacheBackend::Memory;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.observability.log_level = "verbose".into();
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(errors[0], ConfigValidationError::InvalidLogLevel { .. }));
    }
}
