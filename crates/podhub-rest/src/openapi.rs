//! OpenAPI documentation configuration.

use crate::controllers::{HealthResponse, ReadinessResponse};
use podhub_core::{ErrorResponse, FieldError, PageMeta};
use podhub_service::{
    AuthResponse, CategoryRequest, CategoryResponse, EpisodeListResponse, EpisodeRequest,
    EpisodeResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, PodcastListResponse,
    PodcastRequest, PodcastResponse, PodcastSummary, RegisterRequest, ResetPasswordRequest,
    TokenResponse, UserResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Podhub API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Podhub API",
        version = "1.0.0",
        description = "Podcast directory API: categories, podcasts and episodes behind a read-through cache",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // Auth endpoints
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::logout,
        crate::controllers::auth_controller::get_current_user,
        crate::controllers::auth_controller::forgot_password,
        crate::controllers::auth_controller::reset_password,
        // Category endpoints
        crate::controllers::category_controller::list_categories,
        crate::controllers::category_controller::get_category,
        crate::controllers::category_controller::get_category_by_slug,
        crate::controllers::category_controller::create_category,
        crate::controllers::category_controller::update_category,
        crate::controllers::category_controller::delete_category,
        // Podcast endpoints
        crate::controllers::podcast_controller::list_podcasts,
        crate::controllers::podcast_controller::get_podcast,
        crate::controllers::podcast_controller::get_podcast_by_slug,
        crate::controllers::podcast_controller::list_podcast_episodes,
        crate::controllers::podcast_controller::create_podcast,
        crate::controllers::podcast_controller::update_podcast,
        crate::controllers::podcast_controller::delete_podcast,
        // Episode endpoints
        crate::controllers::episode_controller::list_episodes,
        crate::controllers::episode_controller::get_episode,
        crate::controllers::episode_controller::create_episode,
        crate::controllers::episode_controller::update_episode,
        crate::controllers::episode_controller::delete_episode,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            PageMeta,
            MessageResponse,
            // Auth DTOs
            RegisterRequest,
            LoginRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            AuthResponse,
            TokenResponse,
            UserResponse,
            // Catalog DTOs
            CategoryRequest,
            CategoryResponse,
            PodcastRequest,
            PodcastResponse,
            PodcastSummary,
            PodcastListResponse,
            EpisodeRequest,
            EpisodeResponse,
            EpisodeListResponse,
            HealthResponse,
            ReadinessResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "categories", description = "Category management"),
        (name = "podcasts", description = "Podcast management"),
        (name = "episodes", description = "Episode management"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Security addon for JWT Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token authentication"))
                        .build(),
                ),
            );
        }
    }
}
