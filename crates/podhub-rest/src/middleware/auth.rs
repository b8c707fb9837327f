//! Authentication middleware.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use podhub_core::PodhubError;
use podhub_security::Claims;
use podhub_service::AuthService;
use std::sync::Arc;
use tracing::debug;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub auth_service: Arc<dyn AuthService>,
}

impl AuthMiddlewareState {
    pub fn new(auth_service: Arc<dyn AuthService>) -> Self {
        Self { auth_service }
    }
}

/// Validates a bearer token when one is present and stores its claims in the
/// request extensions. Requests without a valid token pass through untouched;
/// [`require_auth`] and the `AuthenticatedUser` extractor decide whether that is allowed.
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = token {
        match state.auth_service.validate_token(token) {
            Ok(claims) => {
                debug!("Authenticated user: {}", claims.sub);
                request.extensions_mut().insert(claims);
            }
            Err(e) => debug!("Token validation failed: {}", e),
        }
    }

    next.run(request).await
}

/// Rejects requests that carry no valid token with 401.
pub async fn require_auth(request: Request<Body>, next: Next) -> Response {
    if request.extensions().get::<Claims>().is_none() {
        return AppError(PodhubError::unauthorized("Unauthenticated.")).into_response();
    }

    next.run(request).await
}
