//! # Podhub Service
//!
//! Business services for the Podhub API, fronted by a read-through cache.
//! Reads go through [`CacheService::remember`]; writes evict through
//! [`CacheService::invalidate_entity`].

pub mod cache;
pub mod dto;
pub mod services;

pub use cache::*;
pub use dto::*;
pub use services::*;
