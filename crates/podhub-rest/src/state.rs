//! Application state for Axum handlers.

use podhub_core::HealthCheck;
use podhub_service::{
    AuthService, CategoryService, EpisodeService, PasswordResetService, PodcastService,
};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub password_reset_service: Arc<dyn PasswordResetService>,
    pub category_service: Arc<dyn CategoryService>,
    pub podcast_service: Arc<dyn PodcastService>,
    pub episode_service: Arc<dyn EpisodeService>,
    /// Dependencies probed by `/ready`.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        password_reset_service: Arc<dyn PasswordResetService>,
        category_service: Arc<dyn CategoryService>,
        podcast_service: Arc<dyn PodcastService>,
        episode_service: Arc<dyn EpisodeService>,
    ) -> Self {
        Self {
            auth_service,
            password_reset_service,
            category_service,
            podcast_service,
            episode_service,
            health_checks: Vec::new(),
        }
    }

    /// Registers a dependency for the readiness probe.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
