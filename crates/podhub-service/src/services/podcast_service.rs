//! Podcast catalog.

use crate::cache::{collection_key, model_key, CacheFilters, CacheService, Cacheable};
use crate::dto::{
    CategoryResponse, EpisodeListResponse, EpisodeResponse, ListPodcastsQuery, MessageResponse,
    PodcastEpisodesQuery, PodcastListResponse, PodcastRequest, PodcastResponse,
};
use crate::services::EPISODES_PER_PAGE;
use async_trait::async_trait;
use podhub_core::{
    CategoryId, Episode, NewPodcast, PageRequest, Podcast, PodcastId, PodhubError, PodhubResult,
    ValidateExt,
};
use podhub_repository::{
    CategoryRepository, EpisodeQuery, EpisodeRepository, PodcastQuery, PodcastRepository,
    PodcastSort,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Podcast service trait.
#[async_trait]
pub trait PodcastService: Send + Sync {
    /// Lists podcasts; each filter combination is cached under its own key.
    async fn list_podcasts(&self, query: ListPodcastsQuery) -> PodhubResult<PodcastListResponse>;

    /// Gets one podcast with its category and episodes, cached under `podcast:{id}`.
    async fn get_podcast(&self, id: PodcastId) -> PodhubResult<PodcastResponse>;

    /// Same view as [`get_podcast`](Self::get_podcast), looked up by slug without caching.
    async fn get_podcast_by_slug(&self, slug: &str) -> PodhubResult<PodcastResponse>;

    /// Pages through one podcast's episodes.
    async fn list_podcast_episodes(
        &self,
        id: PodcastId,
        query: PodcastEpisodesQuery,
    ) -> PodhubResult<EpisodeListResponse>;

    async fn create_podcast(&self, request: PodcastRequest) -> PodhubResult<PodcastResponse>;

    async fn update_podcast(
        &self,
        id: PodcastId,
        request: PodcastRequest,
    ) -> PodhubResult<PodcastResponse>;

    /// Deletes a podcast and, with it, its episodes.
    async fn delete_podcast(&self, id: PodcastId) -> PodhubResult<MessageResponse>;
}

/// Podcast service implementation.
pub struct PodcastServiceImpl {
    podcast_repository: Arc<dyn PodcastRepository>,
    category_repository: Arc<dyn CategoryRepository>,
    episode_repository: Arc<dyn EpisodeRepository>,
    cache: CacheService,
}

impl PodcastServiceImpl {
    #[must_use]
    pub fn new(
        podcast_repository: Arc<dyn PodcastRepository>,
        category_repository: Arc<dyn CategoryRepository>,
        episode_repository: Arc<dyn EpisodeRepository>,
        cache: CacheService,
    ) -> Self {
        Self {
            podcast_repository,
            category_repository,
            episode_repository,
            cache,
        }
    }

    async fn find(&self, id: PodcastId) -> PodhubResult<Podcast> {
        self.podcast_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| PodhubError::not_found("podcast", id))
    }

    /// Builds the detail view: the podcast plus its category and episodes.
    async fn detail(&self, podcast: Podcast) -> PodhubResult<PodcastResponse> {
        let category = self
            .category_repository
            .find_by_id(podcast.category_id)
            .await?
            .map(CategoryResponse::from);
        let episodes = self
            .episode_repository
            .find_by_podcast(podcast.id)
            .await?
            .iter()
            .map(EpisodeResponse::from)
            .collect();

        Ok(PodcastResponse::from(podcast)
            .with_category(category)
            .with_episodes(episodes))
    }

    async fn fetch_page(&self, query: &ListPodcastsQuery) -> PodhubResult<PodcastListResponse> {
        let category_id = match &query.category {
            Some(slug) => Some(
                self.category_repository
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| PodhubError::NoResults("Category not found".to_string()))?
                    .id,
            ),
            None => None,
        };

        let filters = PodcastQuery {
            featured: query.featured,
            category_id,
            search: query.search.clone(),
            sort: query
                .sort
                .as_deref()
                .and_then(PodcastSort::parse)
                .unwrap_or_default(),
        };
        let page = PageRequest::new(
            query.page.unwrap_or(1),
            query.per_page.unwrap_or(PageRequest::DEFAULT_PER_PAGE),
        );

        let podcasts = self.podcast_repository.search(&filters, page).await?;
        if podcasts.is_empty() {
            return Err(PodhubError::NoResults("No podcasts found".to_string()));
        }

        let mut ids: Vec<CategoryId> = podcasts.data.iter().map(|p| p.category_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let categories: HashMap<CategoryId, CategoryResponse> = self
            .category_repository
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, CategoryResponse::from(c)))
            .collect();

        Ok(podcasts
            .map(|podcast| {
                let category = categories.get(&podcast.category_id).cloned();
                PodcastResponse::from(podcast).with_category(category)
            })
            .into())
    }

    async fn ensure_category(&self, id: i64) -> PodhubResult<CategoryId> {
        let id = CategoryId(id);
        match self.category_repository.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(PodhubError::validation(
                "category_id: The selected category does not exist.",
            )),
        }
    }

    async fn ensure_unique_title(
        &self,
        title: &str,
        excluding: Option<PodcastId>,
    ) -> PodhubResult<()> {
        if self.podcast_repository.exists_by_title(title, excluding).await? {
            return Err(PodhubError::validation("title: The title has already been taken."));
        }
        Ok(())
    }
}

/// Cache filters for a podcast listing. Every parameter that changes the result is included.
fn podcast_filters(query: &ListPodcastsQuery) -> CacheFilters {
    CacheFilters::new()
        .with_opt("featured", query.featured)
        .with_opt("category", query.category.as_deref())
        .with_opt("search", query.search.as_deref())
        .with_opt("sort", query.sort.as_deref())
        .with_opt("per_page", query.per_page)
        .with_opt("page", query.page)
}

#[async_trait]
impl PodcastService for PodcastServiceImpl {
    async fn list_podcasts(&self, query: ListPodcastsQuery) -> PodhubResult<PodcastListResponse> {
        query.validate_request()?;

        let key = collection_key(Podcast::ENTITY_TYPE, &podcast_filters(&query));
        self.cache
            .remember(&key, || async {
                debug!(?query, "Loading podcasts from storage");
                self.fetch_page(&query).await
            })
            .await
    }

    async fn get_podcast(&self, id: PodcastId) -> PodhubResult<PodcastResponse> {
        let key = model_key(Podcast::ENTITY_TYPE, id);
        self.cache
            .remember(&key, || async {
                let podcast = self.find(id).await?;
                self.detail(podcast).await
            })
            .await
    }

    async fn get_podcast_by_slug(&self, slug: &str) -> PodhubResult<PodcastResponse> {
        let podcast = self
            .podcast_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| PodhubError::not_found("podcast", slug))?;
        self.detail(podcast).await
    }

    async fn list_podcast_episodes(
        &self,
        id: PodcastId,
        query: PodcastEpisodesQuery,
    ) -> PodhubResult<EpisodeListResponse> {
        query.validate_request()?;
        let podcast = self.find(id).await?;

        let filters = CacheFilters::new()
            .with("podcast_id", podcast.id)
            .with_opt("season", query.season)
            .with_opt("page", query.page);
        let key = collection_key(Episode::ENTITY_TYPE, &filters);

        self.cache
            .remember(&key, || async {
                let episode_query = EpisodeQuery {
                    podcast_id: Some(podcast.id),
                    season: query.season,
                    search: None,
                };
                let page = PageRequest::new(query.page.unwrap_or(1), EPISODES_PER_PAGE);
                let episodes = self.episode_repository.search(&episode_query, page).await?;
                Ok(EpisodeListResponse::from(episodes))
            })
            .await
    }

    async fn create_podcast(&self, request: PodcastRequest) -> PodhubResult<PodcastResponse> {
        request.validate_request()?;

        let category_id = self.ensure_category(request.category_id).await?;
        self.ensure_unique_title(&request.title, None).await?;

        let new = NewPodcast::new(
            category_id,
            request.title,
            request.description,
            request.image,
            request.is_featured,
        );
        let saved = self.podcast_repository.save(&new).await?;
        self.cache.invalidate_entity(&saved).await;

        info!("Podcast created: {} ({})", saved.id, saved.slug);
        Ok(saved.into())
    }

    async fn update_podcast(
        &self,
        id: PodcastId,
        request: PodcastRequest,
    ) -> PodhubResult<PodcastResponse> {
        request.validate_request()?;

        let mut podcast = self.find(id).await?;
        let category_id = self.ensure_category(request.category_id).await?;
        self.ensure_unique_title(&request.title, Some(id)).await?;

        // Moving to another category also changes the old category's views.
        if podcast.category_id != category_id {
            self.cache.invalidate_entity(&podcast).await;
        }

        podcast.retitle(request.title);
        podcast.description = request.description;
        podcast.image = request.image;
        podcast.is_featured = request.is_featured;
        podcast.category_id = category_id;
        podcast.touch();

        let updated = self.podcast_repository.update(&podcast).await?;
        self.cache.invalidate_entity(&updated).await;

        info!("Podcast updated: {}", id);
        Ok(updated.into())
    }

    async fn delete_podcast(&self, id: PodcastId) -> PodhubResult<MessageResponse> {
        let podcast = self.find(id).await?;
        let episodes = self.episode_repository.find_by_podcast(id).await?;

        self.podcast_repository.delete(id).await?;
        self.cache.invalidate_entity(&podcast).await;
        for episode in &episodes {
            self.cache.invalidate_entity(episode).await;
        }

        info!(podcast = %id, episodes = episodes.len(), "Podcast deleted");
        Ok(MessageResponse::new("Podcast deleted successfully"))
    }
}

impl std::fmt::Debug for PodcastServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodcastServiceImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
