//! Password hashing and reset tokens.

mod hasher;
mod reset_token;

pub use hasher::*;
pub use reset_token::*;
