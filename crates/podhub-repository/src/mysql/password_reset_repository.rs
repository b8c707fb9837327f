//! MySQL storage for password reset tokens.

use crate::{traits::PasswordResetRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use podhub_core::{Email, PasswordResetToken, PodhubResult};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct MySqlPasswordResetRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlPasswordResetRepository {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ResetRow {
    email: String,
    token_hash: String,
    created_at: DateTime<Utc>,
}

impl From<ResetRow> for PasswordResetToken {
    fn from(row: ResetRow) -> Self {
        Self {
            email: Email::new_unchecked(row.email),
            token_hash: row.token_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PasswordResetRepository for MySqlPasswordResetRepository {
    async fn upsert(&self, token: &PasswordResetToken) -> PodhubResult<()> {
        debug!("Storing password reset token for {}", token.email);

        sqlx::query(
            r"
            INSERT INTO password_reset_tokens (email, token_hash, created_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE token_hash = VALUES(token_hash), created_at = VALUES(created_at)
            ",
        )
        .bind(token.email.as_str())
        .bind(&token.token_hash)
        .bind(token.created_at)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> PodhubResult<Option<PasswordResetToken>> {
        let row = sqlx::query_as::<_, ResetRow>(
            "SELECT email, token_hash, created_at FROM password_reset_tokens WHERE email = LOWER(?)",
        )
        .bind(email)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(PasswordResetToken::from))
    }

    async fn delete_by_email(&self, email: &str) -> PodhubResult<()> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE email = LOWER(?)")
            .bind(email)
            .execute(self.pool.inner())
            .await?;

        Ok(())
    }
}

impl std::fmt::Debug for MySqlPasswordResetRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlPasswordResetRepository").finish_non_exhaustive()
    }
}
