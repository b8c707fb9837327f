//! Redis-backed cache store.

use super::CacheStore;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use podhub_config::RedisConfig;
use podhub_core::{HealthCheck, HealthStatus, PodhubError, PodhubResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Cache store over a deadpool Redis pool.
///
/// Every key is stored under `key_prefix` so several deployments can share
/// one Redis database; callers only ever see unprefixed keys.
pub struct RedisCacheStore {
    pool: Option<Arc<Pool>>,
    key_prefix: String,
}

impl RedisCacheStore {
    #[must_use]
    pub fn new(pool: Arc<Pool>, key_prefix: impl Into<String>) -> Self {
        Self {
            pool: Some(pool),
            key_prefix: key_prefix.into(),
        }
    }

    /// Builds the pool described by `config`, or a disabled store when Redis is turned off.
    pub fn from_config(config: &RedisConfig) -> PodhubResult<Self> {
        if !config.enabled {
            info!("Redis disabled, cache will always miss");
            return Ok(Self::disabled());
        }

        let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
        redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size as usize));
        let pool = redis_cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| PodhubError::Cache(format!("Failed to create Redis pool: {e}")))?;

        Ok(Self::new(Arc::new(pool), config.key_prefix.clone()))
    }

    /// Creates a no-op store.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            key_prefix: String::new(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    async fn get_conn(&self) -> PodhubResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| PodhubError::Cache(format!("Failed to get Redis connection: {e}"))),
            None => Err(PodhubError::Cache("Cache is disabled".to_string())),
        }
    }

    /// Round-trips a `PING`; used by the readiness probe.
    pub async fn ping(&self) -> PodhubResult<()> {
        let mut conn = self.get_conn().await?;
        let _pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| PodhubError::Cache(format!("Redis ping failed: {e}")))?;
        Ok(())
    }
}

// Reads fall through to storage when Redis is down, so an outage only degrades.
#[async_trait]
impl HealthCheck for RedisCacheStore {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.is_enabled() {
            return HealthStatus::Degraded("cache disabled".to_string());
        }
        match self.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(e.to_string()),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> PodhubResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(self.namespaced(key))
            .await
            .map_err(|e| PodhubError::Cache(format!("Failed to get key '{key}': {e}")))?;

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> PodhubResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = expiry_secs(ttl);

        conn.set_ex::<_, _, ()>(self.namespaced(key), value, ttl_secs)
            .await
            .map_err(|e| PodhubError::Cache(format!("Failed to set key '{key}': {e}")))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> PodhubResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(self.namespaced(key))
            .await
            .map_err(|e| PodhubError::Cache(format!("Failed to delete key '{key}': {e}")))?;

        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> PodhubResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        conn.exists(self.namespaced(key))
            .await
            .map_err(|e| PodhubError::Cache(format!("Failed to check key '{key}': {e}")))
    }

    async fn flush_all(&self) -> PodhubResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;

        if self.key_prefix.is_empty() {
            let (): () = deadpool_redis::redis::cmd("FLUSHDB")
                .query_async(&mut conn)
                .await
                .map_err(|e| PodhubError::Cache(format!("Failed to flush cache: {e}")))?;
            info!("Flushed Redis database");
            return Ok(());
        }

        // KEYS blocks Redis while it runs.
        let keys: Vec<String> = deadpool_redis::redis::cmd("KEYS")
            .arg(format!("{}*", self.key_prefix))
            .query_async(&mut conn)
            .await
            .map_err(|e| PodhubError::Cache(format!("Failed to scan keys: {e}")))?;

        if !keys.is_empty() {
            conn.del::<_, ()>(&keys)
                .await
                .map_err(|e| PodhubError::Cache(format!("Failed to delete keys: {e}")))?;
        }

        info!(count = keys.len(), prefix = %self.key_prefix, "Flushed cache keys");
        Ok(())
    }
}

/// Whole seconds for `SET EX`, rounding partial seconds up.
fn expiry_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("enabled", &self.is_enabled())
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}
