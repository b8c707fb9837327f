//! MySQL category repository implementation.

use crate::{traits::CategoryRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use podhub_core::{Category, CategoryId, NewCategory, PodhubError, PodhubResult, Slug};
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// MySQL category repository implementation.
#[derive(Clone)]
pub struct MySqlCategoryRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlCategoryRepository {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId(row.id),
            name: row.name,
            slug: Slug::new_unchecked(row.slug),
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> PodhubResult<Option<Category>> {
        debug!("Finding category by id: {}", id);

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?"
        ))
        .bind(id.0)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Category::from))
    }

    async fn find_by_slug(&self, slug: &str) -> PodhubResult<Option<Category>> {
        debug!("Finding category by slug: {}", slug);

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Category::from))
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> PodhubResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id IN ("));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.0);
        }
        separated.push_unseparated(")");

        let rows = builder
            .build_query_as::<CategoryRow>()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_all(&self) -> PodhubResult<Vec<Category>> {
        debug!("Loading all categories");

        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"
        ))
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn exists_by_name(
        &self,
        name: &str,
        excluding: Option<CategoryId>,
    ) -> PodhubResult<bool> {
        let result: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM categories WHERE name = ? AND id <> ? LIMIT 1")
                .bind(name)
                .bind(excluding.map_or(0, |id| id.0))
                .fetch_optional(self.pool.inner())
                .await?;

        Ok(result.is_some())
    }

    async fn exists_by_slug(
        &self,
        slug: &str,
        excluding: Option<CategoryId>,
    ) -> PodhubResult<bool> {
        let result: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM categories WHERE slug = ? AND id <> ? LIMIT 1")
                .bind(slug)
                .bind(excluding.map_or(0, |id| id.0))
                .fetch_optional(self.pool.inner())
                .await?;

        Ok(result.is_some())
    }

    async fn count_podcasts(&self, id: CategoryId) -> PodhubResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM podcasts WHERE category_id = ?")
            .bind(id.0)
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn save(&self, category: &NewCategory) -> PodhubResult<Category> {
        debug!("Saving new category: {}", category.name);

        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO categories (name, slug, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(&category.name)
        .bind(category.slug.as_str())
        .bind(&category.description)
        .bind(now)
        .bind(now)
        .execute(self.pool.inner())
        .await?;

        let id = CategoryId(i64::try_from(result.last_insert_id()).unwrap_or_default());
        self.find_by_id(id)
            .await?
            .ok_or_else(|| PodhubError::Internal("Failed to fetch inserted category".to_string()))
    }

    async fn update(&self, category: &Category) -> PodhubResult<Category> {
        debug!("Updating category: {}", category.id);

        sqlx::query(
            r"
            UPDATE categories
            SET name = ?, slug = ?, description = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&category.name)
        .bind(category.slug.as_str())
        .bind(&category.description)
        .bind(category.updated_at)
        .bind(category.id.0)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(category.id)
            .await?
            .ok_or_else(|| PodhubError::not_found("category", category.id))
    }

    async fn delete(&self, id: CategoryId) -> PodhubResult<bool> {
        debug!("Deleting category: {}", id);

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.0)
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlCategoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlCategoryRepository").finish_non_exhaustive()
    }
}
