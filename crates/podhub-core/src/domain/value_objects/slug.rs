//! URL slug value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A URL-safe identifier derived from a human-readable title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derives a slug from free text ("Tech & Science" becomes "tech-science").
    #[must_use]
    pub fn from_title(title: &str) -> Self {
        Self(slug::slugify(title))
    }

    /// Wraps an already-normalized slug, such as one read from storage.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_title() {
        assert_eq!(Slug::from_title("Tech & Science").as_str(), "tech-science");
        assert_eq!(Slug::from_title("  The Daily Show ").as_str(), "the-daily-show");
    }

    #[test]
    fn test_slug_strips_accents() {
        assert_eq!(Slug::from_title("Café Société").as_str(), "cafe-societe");
    }
}
