//! Entities whose cached representations can be invalidated.

use podhub_core::{Category, Episode, Podcast};

/// An entity with a cache identity.
pub trait Cacheable {
    /// Type name used to build keys; lowercased by the key functions.
    const ENTITY_TYPE: &'static str;

    fn cache_id(&self) -> String;

    /// Entities whose cached views embed this one, as `(entity type, id)` pairs.
    fn related(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

impl Cacheable for Category {
    const ENTITY_TYPE: &'static str = "Category";

    fn cache_id(&self) -> String {
        self.id.to_string()
    }
}

impl Cacheable for Podcast {
    const ENTITY_TYPE: &'static str = "Podcast";

    fn cache_id(&self) -> String {
        self.id.to_string()
    }

    fn related(&self) -> Vec<(&'static str, String)> {
        vec![(Category::ENTITY_TYPE, self.category_id.to_string())]
    }
}

impl Cacheable for Episode {
    const ENTITY_TYPE: &'static str = "Episode";

    fn cache_id(&self) -> String {
        self.id.to_string()
    }

    fn related(&self) -> Vec<(&'static str, String)> {
        vec![(Podcast::ENTITY_TYPE, self.podcast_id.to_string())]
    }
}
