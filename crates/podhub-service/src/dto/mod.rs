//! Data Transfer Objects (DTOs).

mod auth_dto;
mod category_dto;
mod episode_dto;
mod podcast_dto;

pub use auth_dto::*;
pub use category_dto::*;
pub use episode_dto::*;
pub use podcast_dto::*;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Simple message response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
