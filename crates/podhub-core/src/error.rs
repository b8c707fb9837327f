//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Podhub.
///
/// Domain, infrastructure and presentation failures all funnel into this
/// enum so the REST layer can map them onto a single response envelope.
#[derive(Error, Debug)]
pub enum PodhubError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("The requested {resource_type} could not be found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// A listing matched nothing
    #[error("{0}")]
    NoResults(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed request parameter
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Business rule violation
    #[error("{0}")]
    BusinessRule(String),

    // ============ Authentication/Authorization Errors ============
    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden access
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    /// Invalid credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password reset token missing, mismatched or expired
    #[error("Invalid password reset token")]
    InvalidResetToken,

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Rate limit exceeded
    #[error("Too many requests, please try again later.")]
    RateLimitExceeded,

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PodhubError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::NoResults(_) => 404,
            Self::BadRequest(_) | Self::InvalidResetToken => 400,
            Self::Validation(_) | Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_)
            | Self::InvalidToken(_)
            | Self::TokenExpired
            | Self::InvalidCredentials => 401,
            Self::Forbidden(_) => 403,
            Self::RateLimitExceeded => 429,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::NoResults(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::BadRequest(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a business rule violation.
    #[must_use]
    pub fn business_rule<T: Into<String>>(message: T) -> Self {
        Self::BusinessRule(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is a transient infrastructure failure.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Cache(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for PodhubError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "record",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return Self::Conflict(db_err.message().to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return Self::Validation(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PodhubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {err}"))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `PodhubError`.
    #[must_use]
    pub fn from_error(error: &PodhubError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&PodhubError> for ErrorResponse {
    fn from(error: &PodhubError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(PodhubError::not_found("podcast", 1).status_code(), 404);
        assert_eq!(PodhubError::NoResults("No podcasts found".into()).status_code(), 404);
        assert_eq!(PodhubError::validation("invalid email").status_code(), 422);
        assert_eq!(PodhubError::bad_request("bad sort").status_code(), 400);
        assert_eq!(PodhubError::unauthorized("not logged in").status_code(), 401);
        assert_eq!(PodhubError::conflict("duplicate").status_code(), 409);
        assert_eq!(PodhubError::business_rule("has podcasts").status_code(), 422);
        assert_eq!(PodhubError::InvalidResetToken.status_code(), 400);
        assert_eq!(PodhubError::RateLimitExceeded.status_code(), 429);
        assert_eq!(PodhubError::Cache("down".into()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PodhubError::not_found("episode", 1).error_code(), "NOT_FOUND");
        assert_eq!(PodhubError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(PodhubError::InvalidCredentials.error_code(), "INVALID_CREDENTIALS");
        assert_eq!(PodhubError::internal("err").error_code(), "INTERNAL_ERROR");
        assert_eq!(
            PodhubError::business_rule("x").error_code(),
            "BUSINESS_RULE_VIOLATION"
        );
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(PodhubError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(
            PodhubError::InvalidResetToken.to_string(),
            "Invalid password reset token"
        );
        assert_eq!(
            PodhubError::NoResults("No podcasts found".into()).to_string(),
            "No podcasts found"
        );
        assert_eq!(
            PodhubError::not_found("category", 7).to_string(),
            "The requested category could not be found: 7"
        );
    }

    #[test]
    fn test_retriable_errors() {
        assert!(PodhubError::Database("connection lost".into()).is_retriable());
        assert!(PodhubError::Cache("timeout".into()).is_retriable());
        assert!(!PodhubError::not_found("podcast", 1).is_retriable());
        assert!(!PodhubError::InvalidCredentials.is_retriable());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = PodhubError::validation("bad input");
        let details = vec![FieldError {
            field: "email".to_string(),
            message: "Invalid email".to_string(),
            code: "email".to_string(),
        }];
        let response = ErrorResponse::from_error(&err).with_details(details);
        assert_eq!(response.code, "VALIDATION_ERROR");
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
