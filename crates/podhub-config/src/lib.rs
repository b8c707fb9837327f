//! # Podhub Config
//!
//! Configuration management for the Podhub API.
//! Values are layered from TOML files and `PODHUB__*` environment variables,
//! then validated before the server starts.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
