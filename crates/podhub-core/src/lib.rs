//! # Podhub Core
//!
//! Core types, traits, and error definitions for the Podhub API.
//! Every other crate in the workspace builds on the error taxonomy,
//! typed identifiers, pagination primitives and domain entities defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
