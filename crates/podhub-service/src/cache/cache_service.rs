//! Read-through caching over a [`CacheStore`].

use super::{cache_keys, CacheFilters, CacheStore, Cacheable};
use podhub_core::PodhubResult;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// TTL applied when neither the caller nor the configuration gives one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Typed read-through cache shared by every service.
///
/// The cache fails open: store errors and undecodable entries are logged and
/// treated as misses, so an unavailable backend only costs latency. Concurrent
/// misses on one key each run their compute closure and the last write wins.
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn CacheStore>,
    default_ttl: Duration,
}

impl CacheService {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Returns the cached value for `key`, or computes, stores and returns it.
    ///
    /// Errors from `compute` reach the caller untouched and nothing is stored.
    pub async fn remember<T, F, Fut>(&self, key: &str, compute: F) -> PodhubResult<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = PodhubResult<T>> + Send,
    {
        self.remember_for(key, None, compute).await
    }

    /// [`remember`](Self::remember) with a TTL override.
    pub async fn remember_for<T, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> PodhubResult<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = PodhubResult<T>> + Send,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        let value = compute().await?;
        self.put(key, &value, ttl.unwrap_or(self.default_ttl)).await;
        Ok(value)
    }

    /// Looks up and decodes `key`. Any failure counts as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Undecodable cache entry, treating as miss");
                None
            }
        }
    }

    /// Stores `value` under `key`. Failures are logged and swallowed.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Cannot serialize value for cache");
                return;
            }
        };

        if let Err(e) = self.store.set_raw(key, &json, ttl).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    /// Removes one key. Returns whether it was present.
    pub async fn forget(&self, key: &str) -> bool {
        match self.store.delete(key).await {
            Ok(existed) => existed,
            Err(e) => {
                warn!(key, error = %e, "Cache delete failed");
                false
            }
        }
    }

    /// Drops every cached entry.
    pub async fn flush(&self) {
        if let Err(e) = self.store.flush_all().await {
            warn!(error = %e, "Cache flush failed");
        }
    }

    /// Evicts the entity's own key and its unfiltered collection key, then
    /// does the same for each related entity.
    ///
    /// Filtered collection keys are left to expire by TTL.
    pub async fn invalidate_entity<E: Cacheable + Sync>(&self, entity: &E) {
        self.invalidate(E::ENTITY_TYPE, &entity.cache_id()).await;
        for (entity_type, id) in entity.related() {
            self.invalidate(entity_type, &id).await;
        }
    }

    async fn invalidate(&self, entity_type: &str, id: &str) {
        let model = cache_keys::model_key(entity_type, id);
        let collection = cache_keys::collection_key(entity_type, &CacheFilters::new());
        self.forget(&model).await;
        self.forget(&collection).await;
        debug!(model, collection, "Invalidated cache entries");
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("enabled", &self.store.is_enabled())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
