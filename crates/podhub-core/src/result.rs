//! Result type aliases for Podhub.

use crate::PodhubError;

/// A specialized `Result` type for Podhub operations.
pub type PodhubResult<T> = Result<T, PodhubError>;
