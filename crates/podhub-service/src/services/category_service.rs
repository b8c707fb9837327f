//! Category management.

use crate::cache::{collection_key, model_key, CacheFilters, CacheService, Cacheable};
use crate::dto::{CategoryRequest, CategoryResponse, MessageResponse};
use async_trait::async_trait;
use podhub_core::{Category, CategoryId, NewCategory, PodhubError, PodhubResult, Slug, ValidateExt};
use podhub_repository::CategoryRepository;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Category service trait.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Lists every category, cached under `categorys`.
    async fn list_categories(&self) -> PodhubResult<Vec<CategoryResponse>>;

    /// Gets one category, cached under `category:{id}`.
    async fn get_category(&self, id: CategoryId) -> PodhubResult<CategoryResponse>;

    /// Looks a category up by slug, bypassing the cache.
    async fn get_category_by_slug(&self, slug: &str) -> PodhubResult<CategoryResponse>;

    async fn create_category(&self, request: CategoryRequest) -> PodhubResult<CategoryResponse>;

    async fn update_category(
        &self,
        id: CategoryId,
        request: CategoryRequest,
    ) -> PodhubResult<CategoryResponse>;

    /// Deletes a category that has no podcasts.
    async fn delete_category(&self, id: CategoryId) -> PodhubResult<MessageResponse>;
}

/// Category service implementation.
pub struct CategoryServiceImpl {
    category_repository: Arc<dyn CategoryRepository>,
    cache: CacheService,
}

impl CategoryServiceImpl {
    #[must_use]
    pub fn new(category_repository: Arc<dyn CategoryRepository>, cache: CacheService) -> Self {
        Self {
            category_repository,
            cache,
        }
    }

    async fn find(&self, id: CategoryId) -> PodhubResult<Category> {
        self.category_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| PodhubError::not_found("category", id))
    }

    async fn ensure_unique(
        &self,
        name: &str,
        slug: &Slug,
        excluding: Option<CategoryId>,
    ) -> PodhubResult<()> {
        if self.category_repository.exists_by_name(name, excluding).await? {
            return Err(PodhubError::validation("name: The name has already been taken."));
        }
        if self.category_repository.exists_by_slug(slug.as_str(), excluding).await? {
            return Err(PodhubError::validation("slug: The slug has already been taken."));
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn list_categories(&self) -> PodhubResult<Vec<CategoryResponse>> {
        let key = collection_key(Category::ENTITY_TYPE, &CacheFilters::new());
        self.cache
            .remember(&key, || async {
                debug!("Loading categories from storage");
                let categories = self.category_repository.find_all().await?;
                Ok(categories.into_iter().map(CategoryResponse::from).collect())
            })
            .await
    }

    async fn get_category(&self, id: CategoryId) -> PodhubResult<CategoryResponse> {
        let key = model_key(Category::ENTITY_TYPE, id);
        self.cache
            .remember(&key, || async { self.find(id).await.map(CategoryResponse::from) })
            .await
    }

    async fn get_category_by_slug(&self, slug: &str) -> PodhubResult<CategoryResponse> {
        self.category_repository
            .find_by_slug(slug)
            .await?
            .map(CategoryResponse::from)
            .ok_or_else(|| PodhubError::not_found("category", slug))
    }

    async fn create_category(&self, request: CategoryRequest) -> PodhubResult<CategoryResponse> {
        request.validate_request()?;

        let new = NewCategory::new(request.name, request.slug, request.description);
        self.ensure_unique(&new.name, &new.slug, None).await?;

        let saved = self.category_repository.save(&new).await?;
        self.cache.invalidate_entity(&saved).await;

        info!("Category created: {} ({})", saved.id, saved.slug);
        Ok(saved.into())
    }

    async fn update_category(
        &self,
        id: CategoryId,
        request: CategoryRequest,
    ) -> PodhubResult<CategoryResponse> {
        request.validate_request()?;

        let mut category = self.find(id).await?;
        category.rename(request.name);
        if let Some(slug) = request.slug {
            category.slug = Slug::new_unchecked(slug);
        }
        category.description = request.description;
        category.touch();
        self.ensure_unique(&category.name, &category.slug, Some(id)).await?;

        let updated = self.category_repository.update(&category).await?;
        self.cache.invalidate_entity(&updated).await;

        info!("Category updated: {}", id);
        Ok(updated.into())
    }

    async fn delete_category(&self, id: CategoryId) -> PodhubResult<MessageResponse> {
        let category = self.find(id).await?;

        let podcasts = self.category_repository.count_podcasts(id).await?;
        if podcasts > 0 {
            warn!(category = %id, podcasts, "Refusing to delete category with podcasts");
            return Err(PodhubError::business_rule(
                "Cannot delete category with associated podcasts",
            ));
        }

        self.category_repository.delete(id).await?;
        self.cache.invalidate_entity(&category).await;

        info!("Category deleted: {}", id);
        Ok(MessageResponse::new("Category deleted successfully"))
    }
}

impl std::fmt::Debug for CategoryServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryServiceImpl")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{InMemoryCacheStore, DEFAULT_TTL};
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::eq;
    use podhub_core::NewPodcast;
    use podhub_repository::memory::MemoryDatabase;
    use podhub_repository::PodcastRepository;

    mock! {
        CategoryRepo {}

        #[async_trait]
        impl CategoryRepository for CategoryRepo {
            async fn find_by_id(&self, id: CategoryId) -> PodhubResult<Option<Category>>;
            async fn find_by_slug(&self, slug: &str) -> PodhubResult<Option<Category>>;
            async fn find_by_ids(&self, ids: &[CategoryId]) -> PodhubResult<Vec<Category>>;
            async fn find_all(&self) -> PodhubResult<Vec<Category>>;
            async fn exists_by_name(
                &self,
                name: &str,
                excluding: Option<CategoryId>,
            ) -> PodhubResult<bool>;
            async fn exists_by_slug(
                &self,
                slug: &str,
                excluding: Option<CategoryId>,
            ) -> PodhubResult<bool>;
            async fn count_podcasts(&self, id: CategoryId) -> PodhubResult<u64>;
            async fn save(&self, category: &NewCategory) -> PodhubResult<Category>;
            async fn update(&self, category: &Category) -> PodhubResult<Category>;
            async fn delete(&self, id: CategoryId) -> PodhubResult<bool>;
        }
    }

    fn technology() -> Category {
        let now = Utc::now();
        Category {
            id: CategoryId(1),
            name: "Technology".into(),
            slug: Slug::from_title("Technology"),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn cache() -> CacheService {
        CacheService::new(Arc::new(InMemoryCacheStore::new()), DEFAULT_TTL)
    }

    fn request(name: &str) -> CategoryRequest {
        CategoryRequest {
            name: name.to_string(),
            slug: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_list_categories_hits_storage_once() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_find_all()
            .times(1)
            .returning(|| Ok(vec![technology()]));
        let service = CategoryServiceImpl::new(Arc::new(repo), cache());

        let first = service.list_categories().await.unwrap();
        let second = service.list_categories().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second[0].slug, "technology");
    }

    #[tokio::test]
    async fn test_missing_category_is_not_cached() {
        let mut repo = MockCategoryRepo::new();
        repo.expect_find_by_id()
            .with(eq(CategoryId(9)))
            .times(2)
            .returning(|_| Ok(None));
        let cache = cache();
        let service = CategoryServiceImpl::new(Arc::new(repo), cache.clone());

        for _ in 0..2 {
            let err = service.get_category(CategoryId(9)).await.unwrap_err();
            assert!(matches!(err, PodhubError::NotFound { .. }));
        }
        assert_eq!(cache.get::<CategoryResponse>("category:9").await, None);
    }

    #[tokio::test]
    async fn test_update_evicts_model_key_but_not_filtered_lists() {
        let db = MemoryDatabase::new();
        let cache = cache();
        let service = CategoryServiceImpl::new(Arc::new(db.categories()), cache.clone());

        let created = service.create_category(request("Technology")).await.unwrap();
        let id = CategoryId(created.id);
        service.list_categories().await.unwrap();
        service.get_category(id).await.unwrap();
        let filtered = collection_key("category", &CacheFilters::new().with("page", 1));
        cache.put(&filtered, &vec![created.clone()], DEFAULT_TTL).await;

        let updated = service.update_category(id, request("Tech News")).await.unwrap();
        assert_eq!(updated.slug, "tech-news");

        assert_eq!(cache.get::<CategoryResponse>(&format!("category:{id}")).await, None);
        assert_eq!(cache.get::<Vec<CategoryResponse>>("categorys").await, None);
        // Filtered listings stay stale until their TTL runs out.
        let stale = cache.get::<Vec<CategoryResponse>>(&filtered).await.unwrap();
        assert_eq!(stale[0].name, "Technology");

        assert_eq!(service.get_category(id).await.unwrap().name, "Tech News");
    }

    #[tokio::test]
    async fn test_create_duplicate_name_rejected() {
        let db = MemoryDatabase::new();
        let service = CategoryServiceImpl::new(Arc::new(db.categories()), cache());
        service.create_category(request("Comedy")).await.unwrap();

        let err = service.create_category(request("Comedy")).await.unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[tokio::test]
    async fn test_delete_refused_while_podcasts_exist() {
        let db = MemoryDatabase::new();
        let service = CategoryServiceImpl::new(Arc::new(db.categories()), cache());
        let category = service.create_category(request("History")).await.unwrap();
        let id = CategoryId(category.id);
        let podcast = db
            .podcasts()
            .save(&NewPodcast::new(
                id,
                "Ancient Worlds".into(),
                "Stories from antiquity".into(),
                None,
                false,
            ))
            .await
            .unwrap();

        let err = service.delete_category(id).await.unwrap_err();
        assert!(matches!(err, PodhubError::BusinessRule(_)));
        assert_eq!(err.to_string(), "Cannot delete category with associated podcasts");

        db.podcasts().delete(podcast.id).await.unwrap();
        let response = service.delete_category(id).await.unwrap();
        assert_eq!(response.message, "Category deleted successfully");
        assert!(service.get_category(id).await.is_err());
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let db = MemoryDatabase::new();
        let service = CategoryServiceImpl::new(Arc::new(db.categories()), cache());
        service.create_category(request("True Crime")).await.unwrap();

        let found = service.get_category_by_slug("true-crime").await.unwrap();
        assert_eq!(found.name, "True Crime");
        assert!(service.get_category_by_slug("missing").await.is_err());
    }
}
