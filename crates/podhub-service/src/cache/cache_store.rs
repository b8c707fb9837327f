//! Key-value store abstraction behind the read-through cache.

use async_trait::async_trait;
use podhub_core::PodhubResult;
use std::time::Duration;

/// A string key-value store with per-entry expiry.
///
/// Values are opaque JSON strings so the trait stays object safe; typed
/// access lives in [`super::CacheService`]. Expiry is enforced by the store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or `None` when absent or expired.
    async fn get_raw(&self, key: &str) -> PodhubResult<Option<String>>;

    /// Stores `value`, replacing any existing entry and restarting its TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> PodhubResult<()>;

    /// Removes the entry. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> PodhubResult<bool>;

    async fn exists(&self, key: &str) -> PodhubResult<bool>;

    /// Removes every entry this store owns.
    async fn flush_all(&self) -> PodhubResult<()>;

    /// A disabled store misses on every read and drops every write.
    fn is_enabled(&self) -> bool;
}
