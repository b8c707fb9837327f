//! Episode catalog.

use crate::cache::{collection_key, model_key, CacheFilters, CacheService, Cacheable};
use crate::dto::{
    EpisodeListResponse, EpisodeRequest, EpisodeResponse, ListEpisodesQuery, MessageResponse,
    PodcastSummary,
};
use async_trait::async_trait;
use podhub_core::{
    Episode, EpisodeId, NewEpisode, PageRequest, Podcast, PodcastId, PodhubError, PodhubResult,
    ValidateExt,
};
use podhub_repository::{EpisodeQuery, EpisodeRepository, PodcastRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Page size of every episode listing.
pub const EPISODES_PER_PAGE: u32 = 10;

/// Episode service trait.
#[async_trait]
pub trait EpisodeService: Send + Sync {
    /// Lists episodes newest season first; each filter combination is cached under its own key.
    async fn list_episodes(&self, query: ListEpisodesQuery) -> PodhubResult<EpisodeListResponse>;

    /// Gets one episode with a summary of its podcast, cached under `episode:{id}`.
    async fn get_episode(&self, id: EpisodeId) -> PodhubResult<EpisodeResponse>;

    async fn create_episode(&self, request: EpisodeRequest) -> PodhubResult<EpisodeResponse>;

    async fn update_episode(
        &self,
        id: EpisodeId,
        request: EpisodeRequest,
    ) -> PodhubResult<EpisodeResponse>;

    async fn delete_episode(&self, id: EpisodeId) -> PodhubResult<MessageResponse>;
}

/// Episode service implementation.
pub struct EpisodeServiceImpl {
    episode_repository: Arc<dyn EpisodeRepository>,
    podcast_repository: Arc<dyn PodcastRepository>,
    cache: CacheService,
}

impl EpisodeServiceImpl {
    #[must_use]
    pub fn new(
        episode_repository: Arc<dyn EpisodeRepository>,
        podcast_repository: Arc<dyn PodcastRepository>,
        cache: CacheService,
    ) -> Self {
        Self {
            episode_repository,
            podcast_repository,
            cache,
        }
    }

    async fn find(&self, id: EpisodeId) -> PodhubResult<Episode> {
        self.episode_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| PodhubError::not_found("episode", id))
    }

    async fn ensure_podcast(&self, id: i64) -> PodhubResult<Podcast> {
        self.podcast_repository
            .find_by_id(PodcastId(id))
            .await?
            .ok_or_else(|| {
                PodhubError::validation("podcast_id: The selected podcast does not exist.")
            })
    }

    async fn ensure_unique_number(
        &self,
        podcast_id: PodcastId,
        number: u32,
        excluding: Option<EpisodeId>,
    ) -> PodhubResult<()> {
        if self
            .episode_repository
            .exists_episode_number(podcast_id, number, excluding)
            .await?
        {
            return Err(PodhubError::validation(
                "episode_number: This episode number is already taken for this podcast.",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl EpisodeService for EpisodeServiceImpl {
    async fn list_episodes(&self, query: ListEpisodesQuery) -> PodhubResult<EpisodeListResponse> {
        query.validate_request()?;

        let filters = CacheFilters::new()
            .with_opt("podcast_id", query.podcast_id)
            .with_opt("season", query.season)
            .with_opt("search", query.search.as_deref())
            .with_opt("page", query.page);
        let key = collection_key(Episode::ENTITY_TYPE, &filters);

        self.cache
            .remember(&key, || async {
                debug!(?query, "Loading episodes from storage");
                let episode_query = EpisodeQuery {
                    podcast_id: query.podcast_id.map(PodcastId),
                    season: query.season,
                    search: query.search.clone(),
                };
                let page = PageRequest::new(query.page.unwrap_or(1), EPISODES_PER_PAGE);
                let episodes = self.episode_repository.search(&episode_query, page).await?;
                Ok(EpisodeListResponse::from(episodes))
            })
            .await
    }

    async fn get_episode(&self, id: EpisodeId) -> PodhubResult<EpisodeResponse> {
        let key = model_key(Episode::ENTITY_TYPE, id);
        self.cache
            .remember(&key, || async {
                let episode = self.find(id).await?;
                let podcast = self
                    .podcast_repository
                    .find_by_id(episode.podcast_id)
                    .await?
                    .as_ref()
                    .map(PodcastSummary::from);
                Ok(EpisodeResponse::from(episode).with_podcast(podcast))
            })
            .await
    }

    async fn create_episode(&self, request: EpisodeRequest) -> PodhubResult<EpisodeResponse> {
        request.validate_request()?;

        let podcast = self.ensure_podcast(request.podcast_id).await?;
        self.ensure_unique_number(podcast.id, request.episode_number, None)
            .await?;

        let new = NewEpisode {
            podcast_id: podcast.id,
            title: request.title,
            description: request.description,
            audio_url: request.audio_url,
            duration: request.duration,
            episode_number: request.episode_number,
            season_number: request.season_number,
            explicit: request.explicit,
            show_notes: request.show_notes,
            publish_date: request.publish_date,
        };
        let saved = self.episode_repository.save(&new).await?;
        self.cache.invalidate_entity(&saved).await;

        info!(
            "Episode created: {} (podcast {}, #{})",
            saved.id, saved.podcast_id, saved.episode_number
        );
        Ok(EpisodeResponse::from(saved).with_podcast(Some(PodcastSummary::from(&podcast))))
    }

    async fn update_episode(
        &self,
        id: EpisodeId,
        request: EpisodeRequest,
    ) -> PodhubResult<EpisodeResponse> {
        request.validate_request()?;

        let mut episode = self.find(id).await?;
        let podcast = self.ensure_podcast(request.podcast_id).await?;
        self.ensure_unique_number(podcast.id, request.episode_number, Some(id))
            .await?;

        // Moving to another podcast also changes the old podcast's views.
        if episode.podcast_id != podcast.id {
            self.cache.invalidate_entity(&episode).await;
        }

        episode.podcast_id = podcast.id;
        episode.title = request.title;
        episode.description = request.description;
        episode.audio_url = request.audio_url;
        episode.duration = request.duration;
        episode.episode_number = request.episode_number;
        episode.season_number = request.season_number;
        episode.publish_date = request.publish_date;
        episode.explicit = request.explicit;
        episode.show_notes = request.show_notes;
        episode.touch();

        let updated = self.episode_repository.update(&episode).await?;
        self.cache.invalidate_entity(&updated).await;

        info!("Episode updated: {}", id);
        Ok(EpisodeResponse::from(updated).with_podcast(Some(PodcastSummary::from(&podcast))))
    }

    async fn delete_episode(&self, id: EpisodeId) -> PodhubResult<MessageResponse> {
        let episode = self.find(id).await?;

        self.episode_repository.delete(id).await?;
        self.cache.invalidate_entity(&episode).await;

        info!("Episode deleted: {}", id);
        Ok(MessageResponse::new("Episode deleted successfully"))
    }
}

impl std::fmt::Debug for EpisodeServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpisodeServiceImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
