//! Forgot-password and reset-password flows.

use crate::dto::{ForgotPasswordRequest, MessageResponse, ResetPasswordRequest};
use async_trait::async_trait;
use chrono::Utc;
use podhub_core::{Email, PasswordResetToken, PodhubError, PodhubResult, ValidateExt};
use podhub_repository::{PasswordResetRepository, UserRepository};
use podhub_security::{issue_reset_token, verify_reset_token, PasswordHasher};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delivers reset links to users.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_link(&self, email: &Email, token: &str) -> PodhubResult<()>;
}

/// Writes reset links to the log instead of sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingResetNotifier;

#[async_trait]
impl ResetNotifier for LoggingResetNotifier {
    async fn send_reset_link(&self, email: &Email, token: &str) -> PodhubResult<()> {
        info!(email = %email, "Password reset link issued");
        debug!(email = %email, token, "Password reset token");
        Ok(())
    }
}

/// Password reset service trait.
#[async_trait]
pub trait PasswordResetService: Send + Sync {
    /// Issues a reset token. The response is identical whether or not the email is registered.
    async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> PodhubResult<MessageResponse>;

    /// Sets a new password if the token matches and has not expired.
    async fn reset_password(&self, request: ResetPasswordRequest) -> PodhubResult<MessageResponse>;
}

/// Password reset service implementation.
pub struct PasswordResetServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    reset_repository: Arc<dyn PasswordResetRepository>,
    password_hasher: Arc<PasswordHasher>,
    notifier: Arc<dyn ResetNotifier>,
    token_ttl: Duration,
}

impl PasswordResetServiceImpl {
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        reset_repository: Arc<dyn PasswordResetRepository>,
        password_hasher: Arc<PasswordHasher>,
        notifier: Arc<dyn ResetNotifier>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            reset_repository,
            password_hasher,
            notifier,
            token_ttl,
        }
    }

    fn is_expired(&self, token: &PasswordResetToken) -> bool {
        chrono::Duration::from_std(self.token_ttl)
            .map_or(false, |ttl| token.is_expired(ttl, Utc::now()))
    }
}

#[async_trait]
impl PasswordResetService for PasswordResetServiceImpl {
    async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> PodhubResult<MessageResponse> {
        request.validate_request()?;

        match self.user_repository.find_by_email(&request.email).await? {
            Some(user) => {
                let issued = issue_reset_token();
                self.reset_repository
                    .upsert(&PasswordResetToken::new(user.email.clone(), issued.digest))
                    .await?;
                self.notifier.send_reset_link(&user.email, &issued.plaintext).await?;
            }
            None => debug!("Password reset requested for unknown email"),
        }

        Ok(MessageResponse::new("Password reset link sent to your email"))
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> PodhubResult<MessageResponse> {
        request.validate_request()?;

        let stored = self
            .reset_repository
            .find_by_email(&request.email)
            .await?
            .ok_or(PodhubError::InvalidResetToken)?;

        if self.is_expired(&stored) {
            warn!(email = %stored.email, "Expired password reset token presented");
            self.reset_repository.delete_by_email(stored.email.as_str()).await?;
            return Err(PodhubError::InvalidResetToken);
        }

        if !verify_reset_token(&request.token, &stored.token_hash) {
            warn!(email = %stored.email, "Mismatched password reset token presented");
            return Err(PodhubError::InvalidResetToken);
        }

        let mut user = self
            .user_repository
            .find_by_email(stored.email.as_str())
            .await?
            .ok_or(PodhubError::InvalidResetToken)?;

        user.change_password(self.password_hasher.hash(&request.password)?);
        self.user_repository.update(&user).await?;
        self.reset_repository.delete_by_email(stored.email.as_str()).await?;

        info!("Password reset for user: {}", user.id);
        Ok(MessageResponse::new("Password has been reset successfully"))
    }
}

impl std::fmt::Debug for PasswordResetServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordResetServiceImpl")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use podhub_core::User;
    use podhub_repository::memory::MemoryDatabase;

    /// Keeps every link it is asked to send.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ResetNotifier for RecordingNotifier {
        async fn send_reset_link(&self, email: &Email, token: &str) -> PodhubResult<()> {
            self.sent.lock().push((email.to_string(), token.to_string()));
            Ok(())
        }
    }

    struct Fixture {
        service: PasswordResetServiceImpl,
        notifier: Arc<RecordingNotifier>,
        db: MemoryDatabase,
        hasher: Arc<PasswordHasher>,
    }

    async fn fixture(token_ttl: Duration) -> Fixture {
        let db = MemoryDatabase::new();
        let hasher = Arc::new(PasswordHasher::with_cost(1));
        let user = User::new(
            "Ada".to_string(),
            Email::new("ada@example.com").unwrap(),
            hasher.hash("old-password").unwrap(),
        );
        db.users().save(&user).await.unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let service = PasswordResetServiceImpl::new(
            Arc::new(db.users()),
            Arc::new(db.password_resets()),
            hasher.clone(),
            notifier.clone(),
            token_ttl,
        );
        Fixture {
            service,
            notifier,
            db,
            hasher,
        }
    }

    fn reset_request(token: &str) -> ResetPasswordRequest {
        ResetPasswordRequest {
            token: token.to_string(),
            email: "ada@example.com".to_string(),
            password: "new-password".to_string(),
            password_confirmation: "new-password".to_string(),
        }
    }

    async fn request_link(f: &Fixture, email: &str) -> MessageResponse {
        f.service
            .forgot_password(ForgotPasswordRequest {
                email: email.to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reset_flow_changes_password() {
        let f = fixture(Duration::from_secs(3600)).await;
        request_link(&f, "ada@example.com").await;
        let token = f.notifier.sent.lock()[0].1.clone();

        let response = f.service.reset_password(reset_request(&token)).await.unwrap();
        assert_eq!(response.message, "Password has been reset successfully");

        let user = f.db.users().find_by_email("ada@example.com").await.unwrap().unwrap();
        assert!(f.hasher.verify("new-password", &user.password_hash).unwrap());

        // Tokens are single use.
        let err = f.service.reset_password(reset_request(&token)).await.unwrap_err();
        assert!(matches!(err, PodhubError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_unknown_email_gets_same_response() {
        let f = fixture(Duration::from_secs(3600)).await;
        let known = request_link(&f, "ada@example.com").await;
        let unknown = request_link(&f, "nobody@example.com").await;

        assert_eq!(known, unknown);
        assert_eq!(f.notifier.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_token_rejected() {
        let f = fixture(Duration::from_secs(3600)).await;
        request_link(&f, "ada@example.com").await;

        let err = f.service.reset_password(reset_request("guess")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let f = fixture(Duration::ZERO).await;
        request_link(&f, "ada@example.com").await;
        let token = f.notifier.sent.lock()[0].1.clone();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let err = f.service.reset_password(reset_request(&token)).await.unwrap_err();
        assert!(matches!(err, PodhubError::InvalidResetToken));
        assert!(f.db.password_resets().find_by_email("ada@example.com").await.unwrap().is_none());
    }
}
