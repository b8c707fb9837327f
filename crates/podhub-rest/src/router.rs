//! Main application router.

use crate::{
    controllers::{
        auth_controller, category_controller, episode_controller, health_controller,
        podcast_controller,
    },
    middleware::{
        auth_middleware, logging_middleware, rate_limit_middleware, require_auth,
        AuthMiddlewareState, RateLimitState,
    },
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use podhub_config::ServerConfig;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the application router.
///
/// Everything under `/api` runs through the auth middleware (which only
/// attaches claims) and then the rate limiter, so authenticated callers are
/// limited per user. Catalog routes additionally require a valid token.
pub fn create_router(
    state: AppState,
    rate_limit: RateLimitState,
    server_config: &ServerConfig,
) -> Router {
    let auth_state = AuthMiddlewareState::new(state.auth_service.clone());

    let api_router = Router::new()
        .nest("/auth", auth_controller::router())
        .nest(
            "/categories",
            category_controller::router().route_layer(middleware::from_fn(require_auth)),
        )
        .nest(
            "/podcasts",
            podcast_controller::router().route_layer(middleware::from_fn(require_auth)),
        )
        .nest(
            "/episodes",
            episode_controller::router().route_layer(middleware::from_fn(require_auth)),
        )
        .layer(middleware::from_fn_with_state(rate_limit, rate_limit_middleware))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let router = Router::new()
        // Health endpoints (no auth required)
        .merge(health_controller::router())
        .nest("/api", api_router)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Podhub API"
}
