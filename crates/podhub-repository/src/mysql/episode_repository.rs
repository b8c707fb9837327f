//! MySQL episode repository implementation.

use super::like_pattern;
use crate::{
    traits::{EpisodeQuery, EpisodeRepository},
    DatabasePool,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use podhub_core::{
    Episode, EpisodeId, NewEpisode, Page, PageRequest, PodcastId, PodhubError, PodhubResult,
};
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const EPISODE_COLUMNS: &str = "id, podcast_id, title, description, audio_url, duration, \
     episode_number, season_number, explicit, show_notes, publish_date, created_at, updated_at";

const EPISODE_ORDER: &str = " ORDER BY season_number DESC, episode_number DESC";

/// MySQL episode repository implementation.
#[derive(Clone)]
pub struct MySqlEpisodeRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlEpisodeRepository {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EpisodeRow {
    id: i64,
    podcast_id: i64,
    title: String,
    description: String,
    audio_url: String,
    duration: u32,
    episode_number: u32,
    season_number: u32,
    explicit: bool,
    show_notes: Option<String>,
    publish_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EpisodeRow> for Episode {
    fn from(row: EpisodeRow) -> Self {
        Self {
            id: EpisodeId(row.id),
            podcast_id: PodcastId(row.podcast_id),
            title: row.title,
            description: row.description,
            audio_url: row.audio_url,
            duration: row.duration,
            episode_number: row.episode_number,
            season_number: row.season_number,
            explicit: row.explicit,
            show_notes: row.show_notes,
            publish_date: row.publish_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &EpisodeQuery) {
    builder.push(" WHERE 1 = 1");
    if let Some(podcast_id) = query.podcast_id {
        builder.push(" AND podcast_id = ").push_bind(podcast_id.0);
    }
    if let Some(season) = query.season {
        builder.push(" AND season_number = ").push_bind(season);
    }
    if let Some(search) = &query.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl EpisodeRepository for MySqlEpisodeRepository {
    async fn find_by_id(&self, id: EpisodeId) -> PodhubResult<Option<Episode>> {
        debug!("Finding episode by id: {}", id);

        let row = sqlx::query_as::<_, EpisodeRow>(&format!(
            "SELECT {EPISODE_COLUMNS} FROM episodes WHERE id = ?"
        ))
        .bind(id.0)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Episode::from))
    }

    async fn search(&self, query: &EpisodeQuery, page: PageRequest) -> PodhubResult<Page<Episode>> {
        debug!(?query, page = page.page, "Searching episodes");

        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM episodes");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await?;

        let mut select =
            QueryBuilder::<MySql>::new(format!("SELECT {EPISODE_COLUMNS} FROM episodes"));
        push_filters(&mut select, query);
        select
            .push(EPISODE_ORDER)
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<EpisodeRow>()
            .fetch_all(self.pool.inner())
            .await?;

        let episodes = rows.into_iter().map(Episode::from).collect();
        Ok(Page::new(episodes, page, u64::try_from(total).unwrap_or_default()))
    }

    async fn find_by_podcast(&self, podcast_id: PodcastId) -> PodhubResult<Vec<Episode>> {
        let rows = sqlx::query_as::<_, EpisodeRow>(&format!(
            "SELECT {EPISODE_COLUMNS} FROM episodes WHERE podcast_id = ?{EPISODE_ORDER}"
        ))
        .bind(podcast_id.0)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Episode::from).collect())
    }

    async fn exists_episode_number(
        &self,
        podcast_id: PodcastId,
        number: u32,
        excluding: Option<EpisodeId>,
    ) -> PodhubResult<bool> {
        let result: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM episodes WHERE podcast_id = ? AND episode_number = ? AND id <> ? LIMIT 1",
        )
        .bind(podcast_id.0)
        .bind(number)
        .bind(excluding.map_or(0, |id| id.0))
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(result.is_some())
    }

    async fn save(&self, episode: &NewEpisode) -> PodhubResult<Episode> {
        debug!("Saving new episode: {}", episode.title);

        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO episodes (podcast_id, title, description, audio_url, duration,
                                  episode_number, season_number, explicit, show_notes,
                                  publish_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(episode.podcast_id.0)
        .bind(&episode.title)
        .bind(&episode.description)
        .bind(&episode.audio_url)
        .bind(episode.duration)
        .bind(episode.episode_number)
        .bind(episode.season_number)
        .bind(episode.explicit)
        .bind(&episode.show_notes)
        .bind(episode.publish_date)
        .bind(now)
        .bind(now)
        .execute(self.pool.inner())
        .await?;

        let id = EpisodeId(i64::try_from(result.last_insert_id()).unwrap_or_default());
        self.find_by_id(id)
            .await?
            .ok_or_else(|| PodhubError::Internal("Failed to fetch inserted episode".to_string()))
    }

    async fn update(&self, episode: &Episode) -> PodhubResult<Episode> {
        debug!("Updating episode: {}", episode.id);

        sqlx::query(
            r"
            UPDATE episodes
            SET podcast_id = ?, title = ?, description = ?, audio_url = ?, duration = ?,
                episode_number = ?, season_number = ?, explicit = ?, show_notes = ?,
                publish_date = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(episode.podcast_id.0)
        .bind(&episode.title)
        .bind(&episode.description)
        .bind(&episode.audio_url)
        .bind(episode.duration)
        .bind(episode.episode_number)
        .bind(episode.season_number)
        .bind(episode.explicit)
        .bind(&episode.show_notes)
        .bind(episode.publish_date)
        .bind(episode.updated_at)
        .bind(episode.id.0)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(episode.id)
            .await?
            .ok_or_else(|| PodhubError::not_found("episode", episode.id))
    }

    async fn delete(&self, id: EpisodeId) -> PodhubResult<bool> {
        debug!("Deleting episode: {}", id);

        let result = sqlx::query("DELETE FROM episodes WHERE id = ?")
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlEpisodeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlEpisodeRepository").finish_non_exhaustive()
    }
}
