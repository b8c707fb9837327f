//! Tracing subscriber setup.

use podhub_config::ObservabilityConfig;
use podhub_core::{PodhubError, PodhubResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config names a level.
const DEFAULT_FILTER: &str = "info,podhub=debug,tower_http=debug";

/// Builds the filter: `RUST_LOG` wins, then the configured level, then [`DEFAULT_FILTER`].
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| {
            if config.log_level.is_empty() {
                EnvFilter::try_new(DEFAULT_FILTER)
            } else {
                EnvFilter::try_new(format!(
                    "{},podhub=debug,tower_http=debug",
                    config.log_level
                ))
            }
        })
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber; `log_format = "json"` switches to structured output.
pub fn init_logging(config: &ObservabilityConfig) -> PodhubResult<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let installed = if config.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    installed.map_err(|e| {
        PodhubError::Configuration(format!("failed to install tracing subscriber: {e}"))
    })
}
