//! Podcast entity.

use crate::{CategoryId, Entity, PodcastId, Slug};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A podcast show belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    pub category_id: CategoryId,
    pub title: String,
    pub slug: Slug,
    pub description: String,
    pub image: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Podcast {
    /// Changes the title and regenerates the slug if it differs.
    pub fn retitle(&mut self, title: String) {
        if self.title != title {
            self.slug = Slug::from_title(&title);
            self.title = title;
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity<PodcastId> for Podcast {
    fn id(&self) -> PodcastId {
        self.id
    }
}

/// Insert payload for a podcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPodcast {
    pub category_id: CategoryId,
    pub title: String,
    pub slug: Slug,
    pub description: String,
    pub image: Option<String>,
    pub is_featured: bool,
}

impl NewPodcast {
    #[must_use]
    pub fn new(
        category_id: CategoryId,
        title: String,
        description: String,
        image: Option<String>,
        is_featured: bool,
    ) -> Self {
        Self {
            category_id,
            slug: Slug::from_title(&title),
            title,
            description,
            image,
            is_featured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_podcast_slug() {
        let new = NewPodcast::new(
            CategoryId(1),
            "The Rust Hour".into(),
            "Weekly systems talk".into(),
            None,
            false,
        );
        assert_eq!(new.slug.as_str(), "the-rust-hour");
    }

    #[test]
    fn test_retitle() {
        let now = Utc::now();
        let mut podcast = Podcast {
            id: PodcastId(3),
            category_id: CategoryId(1),
            title: "Old".into(),
            slug: Slug::from_title("Old"),
            description: "desc".into(),
            image: None,
            is_featured: false,
            created_at: now,
            updated_at: now,
        };
        podcast.retitle("Brand New Show".into());
        assert_eq!(podcast.slug.as_str(), "brand-new-show");
    }
}
