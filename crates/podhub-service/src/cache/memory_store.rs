//! Process-local cache store.

use super::CacheStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use podhub_core::PodhubResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A map of entries with deadlines, for tests and single-instance deployments.
///
/// Expired entries are dropped lazily when read; [`purge_expired`](Self::purge_expired)
/// sweeps the rest.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl InMemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, (_, deadline)| *deadline > now);
        before - entries.len()
    }

    /// Number of entries held, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get_raw(&self, key: &str) -> PodhubResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Ok(None),
                Some((value, deadline)) if *deadline > now => return Ok(Some(value.clone())),
                Some(_) => {}
            }
        }
        // Expired: remove unless a writer refreshed it in between.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|(_, deadline)| *deadline <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> PodhubResult<()> {
        let deadline = Instant::now() + ttl;
        self.entries
            .write()
            .insert(key.to_string(), (value.to_string(), deadline));
        Ok(())
    }

    async fn delete(&self, key: &str) -> PodhubResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> PodhubResult<bool> {
        Ok(self.get_raw(key).await?.is_some())
    }

    async fn flush_all(&self) -> PodhubResult<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites_and_delete_is_idempotent() {
        let store = InMemoryCacheStore::new();
        let ttl = Duration::from_secs(60);
        store.set_raw("category:1", "\"a\"", ttl).await.unwrap();
        store.set_raw("category:1", "\"b\"", ttl).await.unwrap();
        assert_eq!(store.get_raw("category:1").await.unwrap().as_deref(), Some("\"b\""));

        assert!(store.delete("category:1").await.unwrap());
        assert!(!store.delete("category:1").await.unwrap());
        assert!(!store.exists("category:1").await.unwrap());
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let store = InMemoryCacheStore::new();
        store
            .set_raw("episode:3", "{}", Duration::from_millis(20))
            .await
            .unwrap();
        assert!(store.exists("episode:3").await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.get_raw("episode:3").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_purge_and_flush() {
        let store = InMemoryCacheStore::new();
        store.set_raw("a", "1", Duration::ZERO).await.unwrap();
        store.set_raw("b", "2", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);

        store.flush_all().await.unwrap();
        assert!(store.is_empty());
    }
}
