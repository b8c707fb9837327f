//! Podcast DTOs.

use super::{CategoryResponse, EpisodeResponse};
use chrono::{DateTime, Utc};
use podhub_core::{Page, PageMeta, Podcast};
use podhub_repository::PodcastSort;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Body of podcast create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PodcastRequest {
    #[validate(length(
        min = 3,
        max = 255,
        message = "The title must be between 3 and 255 characters."
    ))]
    pub title: String,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "The description must be between 10 and 2000 characters."
    ))]
    pub description: String,

    #[validate(
        url(message = "The image must be a valid URL."),
        custom(function = "podhub_core::rules::image_file")
    )]
    pub image: Option<String>,

    #[validate(range(min = 1, message = "A category is required for the podcast."))]
    pub category_id: i64,

    #[serde(default)]
    pub is_featured: bool,
}

/// Query string of `GET /api/podcasts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPodcastsQuery {
    /// Only featured shows when true.
    pub featured: Option<bool>,

    /// Category slug.
    pub category: Option<String>,

    /// Matches title or description.
    #[validate(length(min = 3, message = "The search term must be at least 3 characters."))]
    pub search: Option<String>,

    /// One of `latest`, `oldest` or `title`.
    #[validate(custom(function = "valid_sort"))]
    pub sort: Option<String>,

    #[validate(range(min = 1, max = 50, message = "The per_page parameter must be between 1 and 50."))]
    pub per_page: Option<u32>,

    #[validate(range(min = 1))]
    pub page: Option<u32>,
}

fn valid_sort(value: &str) -> Result<(), ValidationError> {
    if PodcastSort::parse(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("sort")
            .with_message("The sort parameter must be one of: latest, oldest, title".into()))
    }
}

/// Podcast as returned by the API.
///
/// `category` and `episodes` are only present on detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PodcastResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<Vec<EpisodeResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PodcastResponse {
    /// Attaches the owning category.
    #[must_use]
    pub fn with_category(mut self, category: Option<CategoryResponse>) -> Self {
        self.category = category;
        self
    }

    /// Attaches the episode list and its count.
    #[must_use]
    pub fn with_episodes(mut self, episodes: Vec<EpisodeResponse>) -> Self {
        self.episodes_count = Some(episodes.len() as u64);
        self.episodes = Some(episodes);
        self
    }
}

impl From<&Podcast> for PodcastResponse {
    fn from(podcast: &Podcast) -> Self {
        Self {
            id: podcast.id.into_inner(),
            title: podcast.title.clone(),
            slug: podcast.slug.to_string(),
            description: podcast.description.clone(),
            image: podcast.image.clone(),
            is_featured: podcast.is_featured,
            category_id: podcast.category_id.into_inner(),
            category: None,
            episodes_count: None,
            episodes: None,
            created_at: podcast.created_at,
            updated_at: podcast.updated_at,
        }
    }
}

impl From<Podcast> for PodcastResponse {
    fn from(podcast: Podcast) -> Self {
        Self::from(&podcast)
    }
}

/// Short podcast reference embedded in episode views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PodcastSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

impl From<&Podcast> for PodcastSummary {
    fn from(podcast: &Podcast) -> Self {
        Self {
            id: podcast.id.into_inner(),
            title: podcast.title.clone(),
            slug: podcast.slug.to_string(),
        }
    }
}

/// One page of podcasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PodcastListResponse {
    pub data: Vec<PodcastResponse>,
    pub meta: PageMeta,
}

impl From<Page<PodcastResponse>> for PodcastListResponse {
    fn from(page: Page<PodcastResponse>) -> Self {
        Self {
            data: page.data,
            meta: page.meta,
        }
    }
}
