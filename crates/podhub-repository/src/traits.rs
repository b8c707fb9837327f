//! Repository trait definitions.

use async_trait::async_trait;
use podhub_core::{
    Category, CategoryId, Episode, EpisodeId, NewCategory, NewEpisode, NewPodcast, Page,
    PageRequest, PasswordResetToken, Podcast, PodcastId, PodhubResult, User, UserId,
};

/// Ordering applied to podcast listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PodcastSort {
    /// Insertion order (ascending id).
    #[default]
    Default,
    /// Newest first.
    Latest,
    /// Oldest first.
    Oldest,
    /// Alphabetical by title.
    Title,
}

impl PodcastSort {
    /// Parses the `sort` query parameter.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "latest" => Some(Self::Latest),
            "oldest" => Some(Self::Oldest),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    /// Returns the query-parameter spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Latest => "latest",
            Self::Oldest => "oldest",
            Self::Title => "title",
        }
    }
}

/// Filters for podcast listings. `None` fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodcastQuery {
    /// Only featured shows when `Some(true)`.
    pub featured: Option<bool>,
    pub category_id: Option<CategoryId>,
    /// Substring match on title or description.
    pub search: Option<String>,
    pub sort: PodcastSort,
}

/// Filters for episode listings, always ordered by season then episode number, descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeQuery {
    pub podcast_id: Option<PodcastId>,
    pub season: Option<u32>,
    /// Substring match on title or description.
    pub search: Option<String>,
}

/// Category repository trait.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Finds a category by ID.
    async fn find_by_id(&self, id: CategoryId) -> PodhubResult<Option<Category>>;

    /// Finds a category by slug.
    async fn find_by_slug(&self, slug: &str) -> PodhubResult<Option<Category>>;

    /// Loads several categories at once; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[CategoryId]) -> PodhubResult<Vec<Category>>;

    /// Returns every category ordered by name.
    async fn find_all(&self) -> PodhubResult<Vec<Category>>;

    /// Checks whether another category already uses `name`.
    async fn exists_by_name(&self, name: &str, excluding: Option<CategoryId>) -> PodhubResult<bool>;

    /// Checks whether another category already uses `slug`.
    async fn exists_by_slug(&self, slug: &str, excluding: Option<CategoryId>) -> PodhubResult<bool>;

    /// Counts podcasts filed under the category.
    async fn count_podcasts(&self, id: CategoryId) -> PodhubResult<u64>;

    /// Inserts a new category.
    async fn save(&self, category: &NewCategory) -> PodhubResult<Category>;

    /// Updates an existing category.
    async fn update(&self, category: &Category) -> PodhubResult<Category>;

    /// Deletes a category by ID.
    async fn delete(&self, id: CategoryId) -> PodhubResult<bool>;
}

/// Podcast repository trait.
#[async_trait]
pub trait PodcastRepository: Send + Sync {
    async fn find_by_id(&self, id: PodcastId) -> PodhubResult<Option<Podcast>>;

    async fn find_by_slug(&self, slug: &str) -> PodhubResult<Option<Podcast>>;

    /// Returns one page of podcasts matching `query`.
    async fn search(&self, query: &PodcastQuery, page: PageRequest) -> PodhubResult<Page<Podcast>>;

    /// Checks whether another podcast already uses `title`.
    async fn exists_by_title(
        &self,
        title: &str,
        excluding: Option<PodcastId>,
    ) -> PodhubResult<bool>;

    async fn save(&self, podcast: &NewPodcast) -> PodhubResult<Podcast>;

    async fn update(&self, podcast: &Podcast) -> PodhubResult<Podcast>;

    async fn delete(&self, id: PodcastId) -> PodhubResult<bool>;
}

/// Episode repository trait.
#[async_trait]
pub trait EpisodeRepository: Send + Sync {
    async fn find_by_id(&self, id: EpisodeId) -> PodhubResult<Option<Episode>>;

    /// Returns one page of episodes matching `query`.
    async fn search(&self, query: &EpisodeQuery, page: PageRequest) -> PodhubResult<Page<Episode>>;

    /// Returns every episode of a podcast, newest season first.
    async fn find_by_podcast(&self, podcast_id: PodcastId) -> PodhubResult<Vec<Episode>>;

    /// Checks whether `number` is taken within the podcast.
    async fn exists_episode_number(
        &self,
        podcast_id: PodcastId,
        number: u32,
        excluding: Option<EpisodeId>,
    ) -> PodhubResult<bool>;

    async fn save(&self, episode: &NewEpisode) -> PodhubResult<Episode>;

    async fn update(&self, episode: &Episode) -> PodhubResult<Episode>;

    async fn delete(&self, id: EpisodeId) -> PodhubResult<bool>;
}

/// User repository trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> PodhubResult<Option<User>>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &str) -> PodhubResult<Option<User>>;

    /// Checks if an email exists.
    async fn exists_by_email(&self, email: &str) -> PodhubResult<bool>;

    /// Saves a new user.
    async fn save(&self, user: &User) -> PodhubResult<User>;

    /// Updates an existing user.
    async fn update(&self, user: &User) -> PodhubResult<User>;
}

/// Storage for pending password resets, one per email.
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Stores the token, replacing any earlier one for the same email.
    async fn upsert(&self, token: &PasswordResetToken) -> PodhubResult<()>;

    async fn find_by_email(&self, email: &str) -> PodhubResult<Option<PasswordResetToken>>;

    async fn delete_by_email(&self, email: &str) -> PodhubResult<()>;
}
