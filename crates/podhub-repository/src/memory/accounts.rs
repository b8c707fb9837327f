use super::Tables;
use crate::traits::{PasswordResetRepository, UserRepository};
use async_trait::async_trait;
use parking_lot::RwLock;
use podhub_core::{PasswordResetToken, PodhubError, PodhubResult, User, UserId};
use std::sync::Arc;

/// User repository over [`super::MemoryDatabase`] tables.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> PodhubResult<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> PodhubResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.email.as_str().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> PodhubResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn save(&self, user: &User) -> PodhubResult<User> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(PodhubError::conflict("Email already registered"));
        }
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> PodhubResult<User> {
        let mut tables = self.tables.write();
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| PodhubError::not_found("user", user.id))?;
        *slot = user.clone();
        Ok(user.clone())
    }
}

/// Password reset storage over [`super::MemoryDatabase`] tables.
#[derive(Debug, Clone)]
pub struct InMemoryPasswordResetRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPasswordResetRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
    async fn upsert(&self, token: &PasswordResetToken) -> PodhubResult<()> {
        self.tables
            .write()
            .password_resets
            .insert(token.email.as_str().to_string(), token.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> PodhubResult<Option<PasswordResetToken>> {
        Ok(self
            .tables
            .read()
            .password_resets
            .get(&email.to_lowercase())
            .cloned())
    }

    async fn delete_by_email(&self, email: &str) -> PodhubResult<()> {
        self.tables.write().password_resets.remove(&email.to_lowercase());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDatabase;
    use podhub_core::Email;

    #[tokio::test]
    async fn test_user_lookup_ignores_case() {
        let db = MemoryDatabase::new();
        let user = User::new("Ada".into(), Email::new("ada@example.com").unwrap(), "h".into());
        db.users().save(&user).await.unwrap();

        let found = db.users().find_by_email("ADA@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let dup = User::new("Ada 2".into(), Email::new("ada@example.com").unwrap(), "h".into());
        assert!(db.users().save(&dup).await.is_err());
    }

    #[tokio::test]
    async fn test_reset_token_replaced_per_email() {
        let db = MemoryDatabase::new();
        let repo = db.password_resets();
        let email = Email::new("ada@example.com").unwrap();
        repo.upsert(&PasswordResetToken::new(email.clone(), "first".into()))
            .await
            .unwrap();
        repo.upsert(&PasswordResetToken::new(email, "second".into()))
            .await
            .unwrap();

        let stored = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(stored.token_hash, "second");

        repo.delete_by_email("ada@example.com").await.unwrap();
        assert!(repo.find_by_email("ada@example.com").await.unwrap().is_none());
    }
}
