//! Category DTOs.

use chrono::{DateTime, Utc};
use podhub_core::Category;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Body of category create and update requests.
///
/// When `slug` is omitted it is derived from the name.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(
        custom(function = "podhub_core::rules::not_blank", message = "The name field is required."),
        length(max = 255, message = "The name may not be greater than 255 characters.")
    )]
    pub name: String,

    #[validate(
        custom(function = "podhub_core::rules::valid_slug"),
        length(max = 255)
    )]
    pub slug: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Category as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.into_inner(),
            name: category.name.clone(),
            slug: category.slug.to_string(),
            description: category.description.clone(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self::from(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, slug: Option<&str>) -> CategoryRequest {
        CategoryRequest {
            name: name.to_string(),
            slug: slug.map(str::to_string),
            description: None,
        }
    }

    #[test]
    fn test_category_request_valid() {
        assert!(request("True Crime", None).validate().is_ok());
        assert!(request("True Crime", Some("true-crime")).validate().is_ok());
    }

    #[test]
    fn test_category_request_blank_name() {
        assert!(request("   ", None).validate().is_err());
    }

    #[test]
    fn test_category_request_bad_slug() {
        let errors = request("True Crime", Some("True Crime")).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }

    #[test]
    fn test_category_request_name_too_long() {
        assert!(request(&"x".repeat(256), None).validate().is_err());
    }
}
