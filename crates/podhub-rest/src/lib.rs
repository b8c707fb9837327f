//! # Podhub REST
//!
//! REST API layer using Axum for the Podhub API.
//! Provides HTTP endpoints for authentication, the podcast catalog and health checks.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
