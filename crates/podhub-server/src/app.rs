//! Application wiring: storage, cache and services assembled into router state.

use podhub_config::{AppConfig, CacheBackend};
use podhub_core::{HealthCheck, PodhubError, PodhubResult};
use podhub_repository::{
    create_pool, memory::MemoryDatabase, CategoryRepository, DatabasePool, EpisodeRepository,
    MySqlCategoryRepository, MySqlEpisodeRepository, MySqlPasswordResetRepository,
    MySqlPodcastRepository, MySqlUserRepository, PasswordResetRepository, PodcastRepository,
    UserRepository,
};
use podhub_rest::{create_router, middleware::RateLimitState, AppState};
use podhub_security::{PasswordHasher, TokenProvider};
use podhub_service::{
    AuthServiceImpl, CacheService, CacheStore, CategoryServiceImpl, EpisodeServiceImpl,
    InMemoryCacheStore, LoggingResetNotifier, PasswordResetServiceImpl, PodcastServiceImpl,
    RedisCacheStore,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Every repository the services need.
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepository>,
    pub podcasts: Arc<dyn PodcastRepository>,
    pub episodes: Arc<dyn EpisodeRepository>,
    pub users: Arc<dyn UserRepository>,
    pub password_resets: Arc<dyn PasswordResetRepository>,
}

impl Repositories {
    /// MySQL repositories sharing one pool.
    pub fn mysql(pool: &Arc<DatabasePool>) -> Self {
        Self {
            categories: Arc::new(MySqlCategoryRepository::new(Arc::clone(pool))),
            podcasts: Arc::new(MySqlPodcastRepository::new(Arc::clone(pool))),
            episodes: Arc::new(MySqlEpisodeRepository::new(Arc::clone(pool))),
            users: Arc::new(MySqlUserRepository::new(Arc::clone(pool))),
            password_resets: Arc::new(MySqlPasswordResetRepository::new(Arc::clone(pool))),
        }
    }

    /// In-process repositories over shared tables.
    pub fn memory(db: &MemoryDatabase) -> Self {
        Self {
            categories: Arc::new(db.categories()),
            podcasts: Arc::new(db.podcasts()),
            episodes: Arc::new(db.episodes()),
            users: Arc::new(db.users()),
            password_resets: Arc::new(db.password_resets()),
        }
    }
}

/// The cache service plus, for Redis, the store to probe from `/ready`.
pub struct CacheWiring {
    pub service: CacheService,
    pub health_check: Option<Arc<dyn HealthCheck>>,
}

/// Selects the cache store named by `cache.backend`.
pub fn build_cache(config: &AppConfig) -> PodhubResult<CacheWiring> {
    let ttl = config.cache.default_ttl();
    let wiring = match config.cache.backend {
        CacheBackend::Redis => {
            let store = Arc::new(RedisCacheStore::from_config(&config.redis)?);
            let health_check: Option<Arc<dyn HealthCheck>> = if store.is_enabled() {
                Some(store.clone())
            } else {
                None
            };
            CacheWiring {
                service: CacheService::new(store, ttl),
                health_check,
            }
        }
        CacheBackend::Memory => CacheWiring {
            service: CacheService::new(Arc::new(InMemoryCacheStore::new()), ttl),
            health_check: None,
        },
        CacheBackend::Disabled => CacheWiring {
            service: CacheService::new(Arc::new(RedisCacheStore::disabled()), ttl),
            health_check: None,
        },
    };

    info!(
        backend = ?config.cache.backend,
        ttl_secs = ttl.as_secs(),
        "Cache configured"
    );
    Ok(wiring)
}

/// Builds the services and bundles them into router state.
pub fn build_state(config: &AppConfig, repos: &Repositories, cache: &CacheService) -> AppState {
    let hasher = Arc::new(PasswordHasher::from_config(&config.security));
    let tokens = Arc::new(TokenProvider::new(Arc::new(config.security.clone())));

    AppState::new(
        Arc::new(AuthServiceImpl::new(
            repos.users.clone(),
            hasher.clone(),
            tokens,
        )),
        Arc::new(PasswordResetServiceImpl::new(
            repos.users.clone(),
            repos.password_resets.clone(),
            hasher,
            Arc::new(LoggingResetNotifier),
            config.security.reset_token_ttl(),
        )),
        Arc::new(CategoryServiceImpl::new(
            repos.categories.clone(),
            cache.clone(),
        )),
        Arc::new(PodcastServiceImpl::new(
            repos.podcasts.clone(),
            repos.categories.clone(),
            repos.episodes.clone(),
            cache.clone(),
        )),
        Arc::new(EpisodeServiceImpl::new(
            repos.episodes.clone(),
            repos.podcasts.clone(),
            cache.clone(),
        )),
    )
}

/// Connects to MySQL and Redis, then serves HTTP until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> PodhubResult<()> {
    let pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        pool.run_migrations().await?;
    }

    let cache = build_cache(&config)?;
    let repos = Repositories::mysql(&pool);

    let mut state = build_state(&config, &repos, &cache.service)
        .with_health_check(pool.clone());
    if let Some(check) = cache.health_check {
        state = state.with_health_check(check);
    }

    let rate_limit = RateLimitState::from_config(&config.rate_limit);
    spawn_rate_limit_pruning(rate_limit.clone());

    let router = create_router(state, rate_limit, &config.server);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| PodhubError::Internal(format!("Failed to bind {addr}: {e}")))?;

    crate::startup::print_startup_info(&addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(crate::startup::shutdown_signal())
    .await
    .map_err(|e| PodhubError::Internal(format!("HTTP server error: {e}")))?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Forgets idle rate-limit buckets once a minute.
fn spawn_rate_limit_pruning(rate_limit: RateLimitState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            rate_limit.prune();
            tracing::trace!(clients = rate_limit.tracked_clients(), "Rate limiter pruned");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use podhub_config::RedisConfig;
    use tower::ServiceExt;

    #[test]
    fn test_disabled_redis_gets_no_probe() {
        let config = AppConfig {
            redis: RedisConfig {
                enabled: false,
                ..RedisConfig::default()
            },
            ..AppConfig::default()
        };
        let cache = build_cache(&config).unwrap();
        assert!(cache.health_check.is_none());
        assert!(!cache.service.store().is_enabled());
    }

    #[test]
    fn test_memory_backend() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackend::Memory;
        config.cache.default_ttl_minutes = 10;

        let cache = build_cache(&config).unwrap();
        assert!(cache.service.store().is_enabled());
        assert_eq!(cache.service.default_ttl(), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_wired_router_serves_requests() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackend::Memory;
        config.security.password_hash_cost = 1;

        let cache = build_cache(&config).unwrap();
        let repos = Repositories::memory(&MemoryDatabase::new());
        let state = build_state(&config, &repos, &cache.service);
        let router = create_router(
            state,
            RateLimitState::from_config(&config.rate_limit),
            &config.server,
        );

        let response = router
            .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
