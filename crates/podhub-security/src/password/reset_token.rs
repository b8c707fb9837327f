//! Password reset tokens.
//!
//! The plaintext token is handed to the user once; storage only ever sees
//! its SHA-256 digest.

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

const TOKEN_LENGTH: usize = 64;

/// A freshly issued reset token and the digest to persist for it.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedResetToken {
    pub plaintext: String,
    pub digest: String,
}

impl std::fmt::Debug for IssuedResetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedResetToken")
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

/// Generates a random reset token.
#[must_use]
pub fn issue_reset_token() -> IssuedResetToken {
    let plaintext: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let digest = digest_reset_token(&plaintext);
    IssuedResetToken { plaintext, digest }
}

/// Hex-encoded SHA-256 of a reset token.
#[must_use]
pub fn digest_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Checks a presented token against a stored digest.
#[must_use]
pub fn verify_reset_token(token: &str, digest: &str) -> bool {
    let presented = digest_reset_token(token);
    presented.len() == digest.len()
        && presented
            .bytes()
            .zip(digest.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
