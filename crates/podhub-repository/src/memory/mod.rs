//! Map-backed repositories sharing one set of tables.
//!
//! Unique keys and cascading deletes mirror the MySQL schema so services
//! observe the same conflicts and side effects they would in production.

mod accounts;
mod catalog;

pub use accounts::*;
pub use catalog::*;

use parking_lot::RwLock;
use podhub_core::{Category, Episode, PasswordResetToken, Podcast, User};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) categories: BTreeMap<i64, Category>,
    pub(crate) podcasts: BTreeMap<i64, Podcast>,
    pub(crate) episodes: BTreeMap<i64, Episode>,
    pub(crate) users: Vec<User>,
    pub(crate) password_resets: BTreeMap<String, PasswordResetToken>,
    next_id: i64,
}

impl Tables {
    pub(crate) fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process database handing out repositories over shared tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository::new(Arc::clone(&self.tables))
    }

    #[must_use]
    pub fn podcasts(&self) -> InMemoryPodcastRepository {
        InMemoryPodcastRepository::new(Arc::clone(&self.tables))
    }

    #[must_use]
    pub fn episodes(&self) -> InMemoryEpisodeRepository {
        InMemoryEpisodeRepository::new(Arc::clone(&self.tables))
    }

    #[must_use]
    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::clone(&self.tables))
    }

    #[must_use]
    pub fn password_resets(&self) -> InMemoryPasswordResetRepository {
        InMemoryPasswordResetRepository::new(Arc::clone(&self.tables))
    }
}

/// Case-insensitive substring match on title or description.
pub(crate) fn matches_search(search: Option<&str>, title: &str, description: &str) -> bool {
    search.map_or(true, |term| {
        let term = term.to_lowercase();
        title.to_lowercase().contains(&term) || description.to_lowercase().contains(&term)
    })
}
