//! # Podhub Server Library
//!
//! Wiring and startup utilities for the Podhub API server.

pub mod app;
pub mod startup;
pub mod telemetry;
