//! Password reset token record.

use crate::Email;
use chrono::{DateTime, Duration, Utc};

/// A pending password reset. Only the SHA-256 digest of the emailed token is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetToken {
    pub email: Email,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    #[must_use]
    pub fn new(email: Email, token_hash: String) -> Self {
        Self {
            email,
            token_hash,
            created_at: Utc::now(),
        }
    }

    /// Returns true once `ttl` has passed since issue.
    #[must_use]
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let token = PasswordResetToken::new(Email::new_unchecked("a@b.io"), "digest".into());
        let ttl = Duration::minutes(60);
        assert!(!token.is_expired(ttl, token.created_at + Duration::minutes(59)));
        assert!(token.is_expired(ttl, token.created_at + Duration::minutes(61)));
    }
}
