//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use podhub_core::{ErrorResponse, FieldError, PodhubError};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Creates a successful response carrying a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    /// Creates an error response.
    pub fn error(error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: None,
            error: Some(error),
        }
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub PodhubError);

impl From<PodhubError> for AppError {
    fn from(err: PodhubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        let mut error_response = ErrorResponse::from_error(&self.0);
        if let PodhubError::Validation(message) = &self.0 {
            let details = validation_details(message);
            if !details.is_empty() {
                error_response = error_response.with_details(details);
            }
        }

        (status, Json(ApiResponse::<()>::error(error_response))).into_response()
    }
}

/// Splits a `field: message; field: message` validation string into field errors.
fn validation_details(message: &str) -> Vec<FieldError> {
    message
        .split("; ")
        .filter_map(|part| {
            let (field, text) = part.split_once(": ")?;
            if field.is_empty() || field.contains(' ') {
                return None;
            }
            Some(FieldError {
                field: field.to_string(),
                message: text.to_string(),
                code: "invalid".to_string(),
            })
        })
        .collect()
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Result type for handlers answering `201 Created`.
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Helper to create a success response with a message.
pub fn ok_with_message<T: Serialize>(data: T, message: &str) -> ApiResult<T> {
    Ok(Json(ApiResponse::with_message(data, message)))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T, message: &str) -> CreatedResult<T> {
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(data, message)),
    ))
}
