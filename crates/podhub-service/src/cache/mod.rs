//! Read-through caching for the service layer.
//!
//! Services wrap their reads in [`CacheService::remember`] and call
//! [`CacheService::invalidate_entity`] after each write. The backing
//! [`CacheStore`] is Redis in production and a process-local map in tests.

mod cache_service;
mod cache_store;
mod cacheable;
pub mod cache_keys;
mod memory_store;
mod redis_store;

pub use cache_keys::{collection_key, model_key, CacheFilters};
pub use cache_service::{CacheService, DEFAULT_TTL};
pub use cache_store::CacheStore;
pub use cacheable::Cacheable;
pub use memory_store::InMemoryCacheStore;
pub use redis_store::RedisCacheStore;
