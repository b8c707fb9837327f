//! Category entity.

use crate::{CategoryId, Entity, Slug};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grouping of podcasts ("Technology", "True Crime", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Renames the category, regenerating the slug when the name actually changed.
    pub fn rename(&mut self, name: String) {
        if self.name != name {
            self.slug = Slug::from_title(&name);
            self.name = name;
        }
    }

    /// Marks the entity as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity<CategoryId> for Category {
    fn id(&self) -> CategoryId {
        self.id
    }
}

/// Insert payload for a category; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
}

impl NewCategory {
    /// Builds the payload, deriving the slug from the name unless one is given.
    #[must_use]
    pub fn new(name: String, slug: Option<String>, description: Option<String>) -> Self {
        let slug = slug.map_or_else(|| Slug::from_title(&name), Slug::new_unchecked);
        Self {
            name,
            slug,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Category {
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

    #[test]
    fn test_new_category_derives_slug() {
        let new = NewCategory::new("True Crime".into(), None, None);
        assert_eq!(new.slug.as_str(), "true-crime");
    }

    #[test]
    fn test_new_category_keeps_explicit_slug() {
        let new = NewCategory::new("True Crime".into(), Some("crime".into()), None);
        assert_eq!(new.slug.as_str(), "crime");
    }

    #[test]
    fn test_rename_regenerates_slug() {
        let mut category = sample();
        category.rename("Science & Tech".into());
        assert_eq!(category.slug.as_str(), "science-tech");
    }

    #[test]
    fn test_rename_same_name_keeps_slug() {
        let mut category = sample();
        category.slug = Slug::new_unchecked("custom");
        category.rename("Technology".into());
        assert_eq!(category.slug.as_str(), "custom");
    }
}
