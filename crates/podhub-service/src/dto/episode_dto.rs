//! Episode DTOs.

use super::PodcastSummary;
use chrono::{DateTime, Utc};
use podhub_core::{Episode, Page, PageMeta};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Body of episode create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EpisodeRequest {
    #[validate(range(min = 1, message = "The podcast ID is required."))]
    pub podcast_id: i64,

    #[validate(
        custom(function = "podhub_core::rules::not_blank", message = "The episode title is required."),
        length(max = 255)
    )]
    pub title: String,

    #[validate(custom(
        function = "podhub_core::rules::not_blank",
        message = "The episode description is required."
    ))]
    pub description: String,

    #[validate(
        url(message = "The episode audio must be a valid URL."),
        custom(function = "podhub_core::rules::audio_file")
    )]
    pub audio_url: String,

    /// Length in seconds.
    #[validate(range(
        min = 1,
        max = 86_400,
        message = "The episode duration must be between 1 second and 24 hours."
    ))]
    pub duration: u32,

    #[validate(range(min = 1, message = "The episode number must be at least 1."))]
    pub episode_number: u32,

    #[validate(range(min = 1, message = "The season number must be at least 1."))]
    pub season_number: u32,

    pub publish_date: DateTime<Utc>,

    #[serde(default)]
    pub explicit: bool,

    #[validate(length(max = 10000, message = "Show notes cannot exceed 10000 characters."))]
    pub show_notes: Option<String>,
}

/// Query string of `GET /api/episodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEpisodesQuery {
    pub podcast_id: Option<i64>,

    #[validate(range(min = 1))]
    pub season: Option<u32>,

    /// Matches title or description.
    pub search: Option<String>,

    #[validate(range(min = 1))]
    pub page: Option<u32>,
}

/// Query string of `GET /api/podcasts/{id}/episodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PodcastEpisodesQuery {
    #[validate(range(min = 1))]
    pub season: Option<u32>,

    #[validate(range(min = 1))]
    pub page: Option<u32>,
}

/// Episode as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EpisodeResponse {
    pub id: i64,
    pub podcast_id: i64,
    pub title: String,
    pub description: String,
    pub audio_url: String,
    /// Length in seconds.
    pub duration: u32,
    /// `H:MM:SS`, or `M:SS` under an hour.
    pub formatted_duration: String,
    pub episode_number: u32,
    pub season_number: u32,
    pub publish_date: DateTime<Utc>,
    pub explicit: bool,
    pub show_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podcast: Option<PodcastSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EpisodeResponse {
    #[must_use]
    pub fn with_podcast(mut self, podcast: Option<PodcastSummary>) -> Self {
        self.podcast = podcast;
        self
    }
}

impl From<&Episode> for EpisodeResponse {
    fn from(episode: &Episode) -> Self {
        Self {
            id: episode.id.into_inner(),
            podcast_id: episode.podcast_id.into_inner(),
            title: episode.title.clone(),
            description: episode.description.clone(),
            audio_url: episode.audio_url.clone(),
            duration: episode.duration,
            formatted_duration: episode.formatted_duration(),
            episode_number: episode.episode_number,
            season_number: episode.season_number,
            publish_date: episode.publish_date,
            explicit: episode.explicit,
            show_notes: episode.show_notes.clone(),
            podcast: None,
            created_at: episode.created_at,
            updated_at: episode.updated_at,
        }
    }
}

impl From<Episode> for EpisodeResponse {
    fn from(episode: Episode) -> Self {
        Self::from(&episode)
    }
}

/// One page of episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EpisodeListResponse {
    pub data: Vec<EpisodeResponse>,
    pub meta: PageMeta,
}

impl From<Page<Episode>> for EpisodeListResponse {
    fn from(page: Page<Episode>) -> Self {
        let page = page.map(EpisodeResponse::from);
        Self {
            data: page.data,
            meta: page.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use podhub_core::MAX_EPISODE_DURATION_SECS;

    fn request() -> EpisodeRequest {
        EpisodeRequest {
            podcast_id: 1,
            title: "Pilot".to_string(),
            description: "Where it all begins".to_string(),
            audio_url: "https://cdn.example.com/ep1.mp3".to_string(),
            duration: 1800,
            episode_number: 1,
            season_number: 1,
            publish_date: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            explicit: false,
            show_notes: None,
        }
    }

    #[test]
    fn test_episode_request_valid() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_episode_request_duration_bounds() {
        let mut req = request();
        req.duration = 0;
        assert!(req.validate().is_err());
        req.duration = MAX_EPISODE_DURATION_SECS + 1;
        assert!(req.validate().is_err());
        req.duration = MAX_EPISODE_DURATION_SECS;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_episode_request_audio_extension() {
        let mut req = request();
        req.audio_url = "https://cdn.example.com/ep1.ogg".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("audio_url"));
    }

    #[test]
    fn test_episode_request_zero_numbers() {
        let mut req = request();
        req.episode_number = 0;
        req.season_number = 0;
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("episode_number"));
        assert!(errors.field_errors().contains_key("season_number"));
    }
}
