//! Domain model: the podcast catalog and its users.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
