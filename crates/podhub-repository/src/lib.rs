//! # Podhub Repository
//!
//! Data access for the podcast catalog and user accounts.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PodcastRepository>   (domain interface, traits.rs)
//! MySqlPodcastRepository            (SQLx, mysql/)
//!   ↓
//! MySQL
//! ```
//!
//! The [`memory`] module holds map-backed implementations of every trait
//! for service and HTTP tests.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
