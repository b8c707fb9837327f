//! Registration, login and token validation.

use crate::dto::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse};
use async_trait::async_trait;
use podhub_core::{Email, PodhubError, PodhubResult, User, UserId, ValidateExt};
use podhub_repository::UserRepository;
use podhub_security::{Claims, PasswordHasher, TokenProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and signs it in.
    async fn register(&self, request: RegisterRequest) -> PodhubResult<AuthResponse>;

    /// Exchanges email and password for a token.
    async fn login(&self, request: LoginRequest) -> PodhubResult<AuthResponse>;

    /// Tokens are stateless; logout only acknowledges the request.
    async fn logout(&self, user_id: UserId) -> PodhubResult<MessageResponse>;

    /// Loads the account behind a validated token.
    async fn me(&self, user_id: UserId) -> PodhubResult<UserResponse>;

    /// Validates an access token and returns claims.
    fn validate_token(&self, token: &str) -> PodhubResult<Claims>;
}

/// Authentication service implementation.
pub struct AuthServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<PasswordHasher>,
    token_provider: Arc<TokenProvider>,
}

impl AuthServiceImpl {
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<PasswordHasher>,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_provider,
        }
    }

    fn auth_response(&self, user: &User) -> PodhubResult<AuthResponse> {
        let token = self.token_provider.issue(user)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            token: token.into(),
        })
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> PodhubResult<AuthResponse> {
        debug!("Registering user: {}", request.email);
        request.validate_request()?;

        let email = Email::new(&request.email).map_err(|e| PodhubError::validation(e.to_string()))?;

        if self.user_repository.exists_by_email(email.as_str()).await? {
            return Err(PodhubError::validation("email: The email has already been taken."));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let user = User::new(request.name, email, password_hash);
        let saved = self.user_repository.save(&user).await?;

        info!("User registered: {}", saved.id);
        self.auth_response(&saved)
    }

    async fn login(&self, request: LoginRequest) -> PodhubResult<AuthResponse> {
        debug!("Login attempt for: {}", request.email);
        request.validate_request()?;

        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email - {}", request.email);
                PodhubError::InvalidCredentials
            })?;

        if !self.password_hasher.verify(&request.password, &user.password_hash)? {
            warn!("Login failed: invalid password - {}", user.id);
            return Err(PodhubError::InvalidCredentials);
        }

        info!("User logged in: {}", user.id);
        self.auth_response(&user)
    }

    async fn logout(&self, user_id: UserId) -> PodhubResult<MessageResponse> {
        info!("User logged out: {}", user_id);
        Ok(MessageResponse::new("Successfully logged out"))
    }

    async fn me(&self, user_id: UserId) -> PodhubResult<UserResponse> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| PodhubError::not_found("user", user_id))
    }

    fn validate_token(&self, token: &str) -> PodhubResult<Claims> {
        self.token_provider.validate_token(token)
    }
}

impl std::fmt::Debug for AuthServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podhub_config::SecurityConfig;
    use podhub_repository::memory::MemoryDatabase;

    fn create_auth_service() -> AuthServiceImpl {
        let db = MemoryDatabase::new();
        let config = Arc::new(SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            ..SecurityConfig::default()
        });
        AuthServiceImpl::new(
            Arc::new(db.users()),
            Arc::new(PasswordHasher::with_cost(1)),
            Arc::new(TokenProvider::new(config)),
        )
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            password_confirmation: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = create_auth_service();

        let registered = service.register(register_request("Ada@Example.com")).await.unwrap();
        assert_eq!(registered.user.email, "ada@example.com");
        assert_eq!(registered.token.token_type, "Bearer");

        let logged_in = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        let claims = service.validate_token(&logged_in.token.access_token).unwrap();
        let me = service.me(claims.user_id().unwrap()).await.unwrap();
        assert_eq!(me.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_auth_service();
        service.register(register_request("ada@example.com")).await.unwrap();

        let err = service
            .register(register_request("ADA@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = create_auth_service();
        service.register(register_request("ada@example.com")).await.unwrap();

        let err = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PodhubError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = create_auth_service();
        let err = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_logout_message() {
        let service = create_auth_service();
        let response = service.logout(UserId::new()).await.unwrap();
        assert_eq!(response.message, "Successfully logged out");
    }
}
