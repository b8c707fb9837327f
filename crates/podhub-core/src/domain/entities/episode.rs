use crate::{Entity, EpisodeId, PodcastId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted episode, in seconds.
pub const MAX_EPISODE_DURATION_SECS: u32 = 86_400;

/// One published episode of a podcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub podcast_id: PodcastId,
    pub title: String,
    pub description: String,
    pub audio_url: String,
    /// Length in seconds.
    pub duration: u32,
    pub episode_number: u32,
    pub season_number: u32,
    pub explicit: bool,
    pub show_notes: Option<String>,
    pub publish_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Episode {
    /// Renders the duration as `H:MM:SS` (or `M:SS` under an hour).
    #[must_use]
    pub fn formatted_duration(&self) -> String {
        let (h, m, s) = (self.duration / 3600, (self.duration % 3600) / 60, self.duration % 60);
        if h > 0 {
            format!("{h}:{m:02}:{s:02}")
        } else {
            format!("{m}:{s:02}")
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity<EpisodeId> for Episode {
    fn id(&self) -> EpisodeId {
        self.id
    }
}

/// Insert payload for an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEpisode {
    pub podcast_id: PodcastId,
    pub title: String,
    pub description: String,
    pub audio_url: String,
    pub duration: u32,
    pub episode_number: u32,
    pub season_number: u32,
    pub explicit: bool,
    pub show_notes: Option<String>,
    pub publish_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(duration: u32) -> Episode {
        let now = Utc::now();
        Episode {
            id: EpisodeId(1),
            podcast_id: PodcastId(1),
            title: "Pilot".into(),
            description: "First one".into(),
            audio_url: "https://cdn.example.com/1.mp3".into(),
            duration,
            episode_number: 1,
            season_number: 1,
            explicit: false,
            show_notes: None,
            publish_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_formatted_duration() {
        assert_eq!(episode(59).formatted_duration(), "0:59");
        assert_eq!(episode(754).formatted_duration(), "12:34");
        assert_eq!(episode(3_725).formatted_duration(), "1:02:05");
    }
}
