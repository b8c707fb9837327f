//! Cache key derivation.
//!
//! Keys are plain strings: `category:7` for one entity, `categorys` for the
//! unfiltered collection and `podcasts:<sha256>` for a filtered listing.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Key of a single entity: `lowercase(entity_type):id`.
#[must_use]
pub fn model_key(entity_type: &str, id: impl Display) -> String {
    format!("{}:{}", entity_type.to_lowercase(), id)
}

/// Key of a collection, with a digest of the filters appended when there are any.
#[must_use]
pub fn collection_key(entity_type: &str, filters: &CacheFilters) -> String {
    let base = format!("{}s", entity_type.to_lowercase());
    if filters.is_empty() {
        base
    } else {
        format!("{base}:{}", filters.digest())
    }
}

/// Filter set identifying one cached listing.
///
/// Entries are kept sorted by name, so insertion order never changes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CacheFilters(BTreeMap<String, String>);

impl CacheFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter, replacing any earlier value under the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.0.insert(name.into(), value.to_string());
        self
    }

    /// Adds a filter only when a value is present.
    #[must_use]
    pub fn with_opt<V: Display>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical serialization: a JSON object with keys in ascending order.
    #[must_use]
    pub fn canonical(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.canonical().as_bytes()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for CacheFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |filters, (name, value)| filters.with(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_key() {
        assert_eq!(model_key("Category", 7), "category:7");
        assert_eq!(model_key("category", 7), model_key("CATEGORY", 7));
        assert_ne!(model_key("episode", 1), model_key("episode", 2));
    }

    #[test]
    fn test_unfiltered_collection_key() {
        assert_eq!(collection_key("Category", &CacheFilters::new()), "categorys");
        assert_eq!(collection_key("podcast", &CacheFilters::new()), "podcasts");
    }

    #[test]
    fn test_filter_order_does_not_change_key() {
        let a = CacheFilters::new().with("featured", true).with("category", "tech");
        let b: CacheFilters = [("category", "tech"), ("featured", "true")].into_iter().collect();
        assert_eq!(collection_key("podcast", &a), collection_key("podcast", &b));
    }

    #[test]
    fn test_different_filters_give_different_keys() {
        let page1 = CacheFilters::new().with("page", 1);
        let page2 = CacheFilters::new().with("page", 2);
        let key1 = collection_key("episode", &page1);
        assert_ne!(key1, collection_key("episode", &page2));
        assert!(key1.starts_with("episodes:"));
        assert_eq!(key1.len(), "episodes:".len() + 64);
    }

    #[test]
    fn test_canonical_form_escapes_values() {
        // Without escaping these two would serialize identically.
        let a = CacheFilters::new().with("a", "1\",\"b\":\"2");
        let b = CacheFilters::new().with("a", "1").with("b", "2");
        assert_ne!(a.canonical(), b.canonical());
        assert_eq!(b.canonical(), r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn test_with_opt_skips_none() {
        let filters = CacheFilters::new().with_opt::<u32>("season", None);
        assert!(filters.is_empty());
    }
}
