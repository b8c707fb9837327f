//! # Podhub Security
//!
//! Credential handling for the Podhub API: Argon2id password hashing,
//! HS256 access tokens and single-use password reset tokens.

pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;
