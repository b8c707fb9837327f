//! JWT claims extractor.

use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use podhub_core::{PodhubError, UserId};
use podhub_security::Claims;

/// Extractor for authenticated user claims.
///
/// The claims are placed in the request extensions by the auth middleware;
/// a missing entry means no valid bearer token was presented.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    /// The user id carried in the `sub` claim.
    pub fn id(&self) -> Result<UserId, AppError> {
        self.0
            .user_id()
            .ok_or_else(|| AppError(PodhubError::InvalidToken("Malformed subject".to_string())))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError(PodhubError::unauthorized("Unauthenticated.")))
    }
}
