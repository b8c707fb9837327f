use super::{matches_search, Tables};
use crate::traits::{
    CategoryRepository, EpisodeQuery, EpisodeRepository, PodcastQuery, PodcastRepository,
    PodcastSort,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use podhub_core::{
    Category, CategoryId, Episode, EpisodeId, NewCategory, NewEpisode, NewPodcast, Page,
    PageRequest, Podcast, PodcastId, PodhubError, PodhubResult,
};
use std::sync::Arc;

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    let data = items.into_iter().skip(offset).take(limit).collect();
    Page::new(data, page, total)
}

fn cascade_podcast(tables: &mut Tables, podcast_id: PodcastId) {
    tables.episodes.retain(|_, e| e.podcast_id != podcast_id);
}

/// Category repository over [`super::MemoryDatabase`] tables.
#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCategoryRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }

    fn check_unique(
        tables: &Tables,
        name: &str,
        slug: &str,
        excluding: Option<CategoryId>,
    ) -> PodhubResult<()> {
        let clash = tables.categories.values().any(|c| {
            Some(c.id) != excluding && (c.name == name || c.slug.as_str() == slug)
        });
        if clash {
            return Err(PodhubError::conflict("Category name or slug already exists"));
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> PodhubResult<Option<Category>> {
        Ok(self.tables.read().categories.get(&id.0).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> PodhubResult<Option<Category>> {
        Ok(self
            .tables
            .read()
            .categories
            .values()
            .find(|c| c.slug.as_str() == slug)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> PodhubResult<Vec<Category>> {
        let tables = self.tables.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.categories.get(&id.0).cloned())
            .collect())
    }

    async fn find_all(&self) -> PodhubResult<Vec<Category>> {
        let mut all: Vec<Category> = self.tables.read().categories.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn exists_by_name(
        &self,
        name: &str,
        excluding: Option<CategoryId>,
    ) -> PodhubResult<bool> {
        Ok(self
            .tables
            .read()
            .categories
            .values()
            .any(|c| c.name == name && Some(c.id) != excluding))
    }

    async fn exists_by_slug(
        &self,
        slug: &str,
        excluding: Option<CategoryId>,
    ) -> PodhubResult<bool> {
        Ok(self
            .tables
            .read()
            .categories
            .values()
            .any(|c| c.slug.as_str() == slug && Some(c.id) != excluding))
    }

    async fn count_podcasts(&self, id: CategoryId) -> PodhubResult<u64> {
        Ok(self
            .tables
            .read()
            .podcasts
            .values()
            .filter(|p| p.category_id == id)
            .count() as u64)
    }

    async fn save(&self, category: &NewCategory) -> PodhubResult<Category> {
        let mut tables = self.tables.write();
        Self::check_unique(&tables, &category.name, category.slug.as_str(), None)?;

        let now = Utc::now();
        let saved = Category {
            id: CategoryId(tables.next_id()),
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(saved.id.0, saved.clone());
        Ok(saved)
    }

    async fn update(&self, category: &Category) -> PodhubResult<Category> {
        let mut tables = self.tables.write();
        if !tables.categories.contains_key(&category.id.0) {
            return Err(PodhubError::not_found("category", category.id));
        }
        Self::check_unique(&tables, &category.name, category.slug.as_str(), Some(category.id))?;
        tables.categories.insert(category.id.0, category.clone());
        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> PodhubResult<bool> {
        let mut tables = self.tables.write();
        if tables.categories.remove(&id.0).is_none() {
            return Ok(false);
        }
        let orphaned: Vec<PodcastId> = tables
            .podcasts
            .values()
            .filter(|p| p.category_id == id)
            .map(|p| p.id)
            .collect();
        for podcast_id in orphaned {
            tables.podcasts.remove(&podcast_id.0);
            cascade_podcast(&mut tables, podcast_id);
        }
        Ok(true)
    }
}

/// Podcast repository over [`super::MemoryDatabase`] tables.
#[derive(Debug, Clone)]
pub struct InMemoryPodcastRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPodcastRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }

    fn check_references(
        tables: &Tables,
        category_id: CategoryId,
        title: &str,
        excluding: Option<PodcastId>,
    ) -> PodhubResult<()> {
        if !tables.categories.contains_key(&category_id.0) {
            return Err(PodhubError::validation("The selected category id is invalid."));
        }
        if tables
            .podcasts
            .values()
            .any(|p| p.title == title && Some(p.id) != excluding)
        {
            return Err(PodhubError::conflict("Podcast title already exists"));
        }
        Ok(())
    }
}

#[async_trait]
impl PodcastRepository for InMemoryPodcastRepository {
    async fn find_by_id(&self, id: PodcastId) -> PodhubResult<Option<Podcast>> {
        Ok(self.tables.read().podcasts.get(&id.0).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> PodhubResult<Option<Podcast>> {
        Ok(self
            .tables
            .read()
            .podcasts
            .values()
            .find(|p| p.slug.as_str() == slug)
            .cloned())
    }

    async fn search(&self, query: &PodcastQuery, page: PageRequest) -> PodhubResult<Page<Podcast>> {
        let mut matched: Vec<Podcast> = self
            .tables
            .read()
            .podcasts
            .values()
            .filter(|p| query.featured != Some(true) || p.is_featured)
            .filter(|p| query.category_id.map_or(true, |id| p.category_id == id))
            .filter(|p| matches_search(query.search.as_deref(), &p.title, &p.description))
            .cloned()
            .collect();

        match query.sort {
            PodcastSort::Default => {}
            PodcastSort::Latest => {
                matched.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            }
            PodcastSort::Oldest => {
                matched.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            }
            PodcastSort::Title => matched.sort_by(|a, b| a.title.cmp(&b.title)),
        }

        Ok(paginate(matched, page))
    }

    async fn exists_by_title(
        &self,
        title: &str,
        excluding: Option<PodcastId>,
    ) -> PodhubResult<bool> {
        Ok(self
            .tables
            .read()
            .podcasts
            .values()
            .any(|p| p.title == title && Some(p.id) != excluding))
    }

    async fn save(&self, podcast: &NewPodcast) -> PodhubResult<Podcast> {
        let mut tables = self.tables.write();
        Self::check_references(&tables, podcast.category_id, &podcast.title, None)?;

        let now = Utc::now();
        let saved = Podcast {
            id: PodcastId(tables.next_id()),
            category_id: podcast.category_id,
            title: podcast.title.clone(),
            slug: podcast.slug.clone(),
            description: podcast.description.clone(),
            image: podcast.image.clone(),
            is_featured: podcast.is_featured,
            created_at: now,
            updated_at: now,
        };
        tables.podcasts.insert(saved.id.0, saved.clone());
        Ok(saved)
    }

    async fn update(&self, podcast: &Podcast) -> PodhubResult<Podcast> {
        let mut tables = self.tables.write();
        if !tables.podcasts.contains_key(&podcast.id.0) {
            return Err(PodhubError::not_found("podcast", podcast.id));
        }
        Self::check_references(&tables, podcast.category_id, &podcast.title, Some(podcast.id))?;
        tables.podcasts.insert(podcast.id.0, podcast.clone());
        Ok(podcast.clone())
    }

    async fn delete(&self, id: PodcastId) -> PodhubResult<bool> {
        let mut tables = self.tables.write();
        if tables.podcasts.remove(&id.0).is_none() {
            return Ok(false);
        }
        cascade_podcast(&mut tables, id);
        Ok(true)
    }
}

/// Episode repository over [`super::MemoryDatabase`] tables.
#[derive(Debug, Clone)]
pub struct InMemoryEpisodeRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryEpisodeRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }

    fn check_references(
        tables: &Tables,
        podcast_id: PodcastId,
        number: u32,
        excluding: Option<EpisodeId>,
    ) -> PodhubResult<()> {
        if !tables.podcasts.contains_key(&podcast_id.0) {
            return Err(PodhubError::validation("The selected podcast id is invalid."));
        }
        if tables.episodes.values().any(|e| {
            e.podcast_id == podcast_id && e.episode_number == number && Some(e.id) != excluding
        }) {
            return Err(PodhubError::conflict("Episode number already exists for this podcast"));
        }
        Ok(())
    }
}

fn newest_first(a: &Episode, b: &Episode) -> std::cmp::Ordering {
    b.season_number
        .cmp(&a.season_number)
        .then(b.episode_number.cmp(&a.episode_number))
}

#[async_trait]
impl EpisodeRepository for InMemoryEpisodeRepository {
    async fn find_by_id(&self, id: EpisodeId) -> PodhubResult<Option<Episode>> {
        Ok(self.tables.read().episodes.get(&id.0).cloned())
    }

    async fn search(&self, query: &EpisodeQuery, page: PageRequest) -> PodhubResult<Page<Episode>> {
        let mut matched: Vec<Episode> = self
            .tables
            .read()
            .episodes
            .values()
            .filter(|e| query.podcast_id.map_or(true, |id| e.podcast_id == id))
            .filter(|e| query.season.map_or(true, |s| e.season_number == s))
            .filter(|e| matches_search(query.search.as_deref(), &e.title, &e.description))
            .cloned()
            .collect();
        matched.sort_by(newest_first);
        Ok(paginate(matched, page))
    }

    async fn find_by_podcast(&self, podcast_id: PodcastId) -> PodhubResult<Vec<Episode>> {
        let mut episodes: Vec<Episode> = self
            .tables
            .read()
            .episodes
            .values()
            .filter(|e| e.podcast_id == podcast_id)
            .cloned()
            .collect();
        episodes.sort_by(newest_first);
        Ok(episodes)
    }

    async fn exists_episode_number(
        &self,
        podcast_id: PodcastId,
        number: u32,
        excluding: Option<EpisodeId>,
    ) -> PodhubResult<bool> {
        Ok(self.tables.read().episodes.values().any(|e| {
            e.podcast_id == podcast_id && e.episode_number == number && Some(e.id) != excluding
        }))
    }

    async fn save(&self, episode: &NewEpisode) -> PodhubResult<Episode> {
        let mut tables = self.tables.write();
        Self::check_references(&tables, episode.podcast_id, episode.episode_number, None)?;

        let now = Utc::now();
        let saved = Episode {
            id: EpisodeId(tables.next_id()),
            podcast_id: episode.podcast_id,
            title: episode.title.clone(),
            description: episode.description.clone(),
            audio_url: episode.audio_url.clone(),
            duration: episode.duration,
            episode_number: episode.episode_number,
            season_number: episode.season_number,
            explicit: episode.explicit,
            show_notes: episode.show_notes.clone(),
            publish_date: episode.publish_date,
            created_at: now,
            updated_at: now,
        };
        tables.episodes.insert(saved.id.0, saved.clone());
        Ok(saved)
    }

    async fn update(&self, episode: &Episode) -> PodhubResult<Episode> {
        let mut tables = self.tables.write();
        if !tables.episodes.contains_key(&episode.id.0) {
            return Err(PodhubError::not_found("episode", episode.id));
        }
        Self::check_references(
            &tables,
            episode.podcast_id,
            episode.episode_number,
            Some(episode.id),
        )?;
        tables.episodes.insert(episode.id.0, episode.clone());
        Ok(episode.clone())
    }

    async fn delete(&self, id: EpisodeId) -> PodhubResult<bool> {
        Ok(self.tables.write().episodes.remove(&id.0).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDatabase;
    use chrono::Utc;

    async fn seed(db: &MemoryDatabase) -> (Category, Podcast) {
        let category = db
            .categories()
            .save(&NewCategory::new("Technology".into(), None, None))
            .await
            .unwrap();
        let podcast = db
            .podcasts()
            .save(&NewPodcast::new(
                category.id,
                "Rust Hour".into(),
                "Weekly systems talk".into(),
                None,
                true,
            ))
            .await
            .unwrap();
        (category, podcast)
    }

    fn new_episode(podcast_id: PodcastId, season: u32, number: u32) -> NewEpisode {
        NewEpisode {
            podcast_id,
            title: format!("S{season}E{number}"),
            description: "An episode".into(),
            audio_url: "https://cdn.example.com/a.mp3".into(),
            duration: 1800,
            episode_number: number,
            season_number: season,
            explicit: false,
            show_notes: None,
            publish_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_category_name_conflicts() {
        let db = MemoryDatabase::new();
        seed(&db).await;
        let err = db
            .categories()
            .save(&NewCategory::new("Technology".into(), Some("tech-2".into()), None))
            .await
            .unwrap_err();
        assert!(matches!(err, PodhubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_podcast_search_filters() {
        let db = MemoryDatabase::new();
        let (category, _) = seed(&db).await;
        db.podcasts()
            .save(&NewPodcast::new(
                category.id,
                "Cooking Daily".into(),
                "Recipes".into(),
                None,
                false,
            ))
            .await
            .unwrap();

        let featured = PodcastQuery {
            featured: Some(true),
            ..PodcastQuery::default()
        };
        let page = db.podcasts().search(&featured, PageRequest::default()).await.unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].title, "Rust Hour");

        let search = PodcastQuery {
            search: Some("recipe".into()),
            sort: PodcastSort::Title,
            ..PodcastQuery::default()
        };
        let page = db.podcasts().search(&search, PageRequest::default()).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.data[0].title, "Cooking Daily");
    }

    #[tokio::test]
    async fn test_episodes_ordered_newest_season_first() {
        let db = MemoryDatabase::new();
        let (_, podcast) = seed(&db).await;
        let repo = db.episodes();
        for (season, number) in [(1, 1), (2, 3), (1, 2)] {
            repo.save(&new_episode(podcast.id, season, number)).await.unwrap();
        }

        let page = repo
            .search(
                &EpisodeQuery {
                    podcast_id: Some(podcast.id),
                    ..EpisodeQuery::default()
                },
                PageRequest::new(1, 10),
            )
            .await
            .unwrap();
        let order: Vec<(u32, u32)> = page
            .data
            .iter()
            .map(|e| (e.season_number, e.episode_number))
            .collect();
        assert_eq!(order, vec![(2, 3), (1, 2), (1, 1)]);
    }

    #[tokio::test]
    async fn test_duplicate_episode_number_conflicts() {
        let db = MemoryDatabase::new();
        let (_, podcast) = seed(&db).await;
        db.episodes().save(&new_episode(podcast.id, 1, 1)).await.unwrap();
        let err = db
            .episodes()
            .save(&new_episode(podcast.id, 2, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, PodhubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_deleting_podcast_cascades_to_episodes() {
        let db = MemoryDatabase::new();
        let (category, podcast) = seed(&db).await;
        let episode = db.episodes().save(&new_episode(podcast.id, 1, 1)).await.unwrap();

        assert_eq!(db.categories().count_podcasts(category.id).await.unwrap(), 1);
        assert!(db.podcasts().delete(podcast.id).await.unwrap());
        assert!(db.episodes().find_by_id(episode.id).await.unwrap().is_none());
        assert_eq!(db.categories().count_podcasts(category.id).await.unwrap(), 0);
    }
}
