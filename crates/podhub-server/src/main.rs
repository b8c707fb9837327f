//! # Podhub Server
//!
//! Main entry point for the Podhub API.

use podhub_config::ConfigLoader;
use podhub_server::{app, startup, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_logging(&config.observability) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    startup::print_banner();

    info!("Starting Podhub API...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = app::run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
