//! MySQL podcast repository implementation.

use super::like_pattern;
use crate::{
    traits::{PodcastQuery, PodcastRepository, PodcastSort},
    DatabasePool,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use podhub_core::{
    CategoryId, NewPodcast, Page, PageRequest, Podcast, PodcastId, PodhubError, PodhubResult, Slug,
};
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const PODCAST_COLUMNS: &str =
    "id, category_id, title, slug, description, image, is_featured, created_at, updated_at";

/// MySQL podcast repository implementation.
#[derive(Clone)]
pub struct MySqlPodcastRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlPodcastRepository {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PodcastRow {
    id: i64,
    category_id: i64,
    title: String,
    slug: String,
    description: String,
    image: Option<String>,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PodcastRow> for Podcast {
    fn from(row: PodcastRow) -> Self {
        Self {
            id: PodcastId(row.id),
            category_id: CategoryId(row.category_id),
            title: row.title,
            slug: Slug::new_unchecked(row.slug),
            description: row.description,
            image: row.image,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &PodcastQuery) {
    builder.push(" WHERE 1 = 1");
    if query.featured == Some(true) {
        builder.push(" AND is_featured = TRUE");
    }
    if let Some(category_id) = query.category_id {
        builder.push(" AND category_id = ").push_bind(category_id.0);
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

const fn order_clause(sort: PodcastSort) -> &'static str {
    match sort {
        PodcastSort::Default => " ORDER BY id ASC",
        PodcastSort::Latest => " ORDER BY created_at DESC, id DESC",
        PodcastSort::Oldest => " ORDER BY created_at ASC, id ASC",
        PodcastSort::Title => " ORDER BY title ASC",
    }
}

#[async_trait]
impl PodcastRepository for MySqlPodcastRepository {
    async fn find_by_id(&self, id: PodcastId) -> PodhubResult<Option<Podcast>> {
        debug!("Finding podcast by id: {}", id);

        let row = sqlx::query_as::<_, PodcastRow>(&format!(
            "SELECT {PODCAST_COLUMNS} FROM podcasts WHERE id = ?"
        ))
        .bind(id.0)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Podcast::from))
    }

    async fn find_by_slug(&self, slug: &str) -> PodhubResult<Option<Podcast>> {
        debug!("Finding podcast by slug: {}", slug);

        let row = sqlx::query_as::<_, PodcastRow>(&format!(
            "SELECT {PODCAST_COLUMNS} FROM podcasts WHERE slug = ? ORDER BY id LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Podcast::from))
    }

    async fn search(&self, query: &PodcastQuery, page: PageRequest) -> PodhubResult<Page<Podcast>> {
        debug!(?query, page = page.page, per_page = page.per_page, "Searching podcasts");

        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM podcasts");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await?;

        let mut select =
            QueryBuilder::<MySql>::new(format!("SELECT {PODCAST_COLUMNS} FROM podcasts"));
        push_filters(&mut select, query);
        select
            .push(order_clause(query.sort))
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<PodcastRow>()
            .fetch_all(self.pool.inner())
            .await?;

        let podcasts = rows.into_iter().map(Podcast::from).collect();
        Ok(Page::new(podcasts, page, u64::try_from(total).unwrap_or_default()))
    }

    async fn exists_by_title(
        &self,
        title: &str,
        excluding: Option<PodcastId>,
    ) -> PodhubResult<bool> {
        let result: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM podcasts WHERE title = ? AND id <> ? LIMIT 1")
                .bind(title)
                .bind(excluding.map_or(0, |id| id.0))
                .fetch_optional(self.pool.inner())
                .await?;

        Ok(result.is_some())
    }

    async fn save(&self, podcast: &NewPodcast) -> PodhubResult<Podcast> {
        debug!("Saving new podcast: {}", podcast.title);

        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO podcasts (category_id, title, slug, description, image, is_featured,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(podcast.category_id.0)
        .bind(&podcast.title)
        .bind(podcast.slug.as_str())
        .bind(&podcast.description)
        .bind(&podcast.image)
        .bind(podcast.is_featured)
        .bind(now)
        .bind(now)
        .execute(self.pool.inner())
        .await?;

        let id = PodcastId(i64::try_from(result.last_insert_id()).unwrap_or_default());
        self.find_by_id(id)
            .await?
            .ok_or_else(|| PodhubError::Internal("Failed to fetch inserted podcast".to_string()))
    }

    async fn update(&self, podcast: &Podcast) -> PodhubResult<Podcast> {
        debug!("Updating podcast: {}", podcast.id);

        sqlx::query(
            r"
            UPDATE podcasts
            SET category_id = ?, title = ?, slug = ?, description = ?, image = ?,
                is_featured = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(podcast.category_id.0)
        .bind(&podcast.title)
        .bind(podcast.slug.as_str())
        .bind(&podcast.description)
        .bind(&podcast.image)
        .bind(podcast.is_featured)
        .bind(podcast.updated_at)
        .bind(podcast.id.0)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(podcast.id)
            .await?
            .ok_or_else(|| PodhubError::not_found("podcast", podcast.id))
    }

    async fn delete(&self, id: PodcastId) -> PodhubResult<bool> {
        debug!("Deleting podcast: {}", id);

        let result = sqlx::query("DELETE FROM podcasts WHERE id = ?")
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlPodcastRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlPodcastRepository").finish_non_exhaustive()
    }
}
