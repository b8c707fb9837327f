//! JWT token provider for creating and validating tokens.

use super::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use podhub_config::SecurityConfig;
use podhub_core::{PodhubError, PodhubResult, User};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// A bearer token handed to a client after register or login.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Expiration as a Unix timestamp.
    pub expires_at: i64,
}

/// JWT token provider service.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Issues an access token for `user`.
    pub fn issue(&self, user: &User) -> PodhubResult<IssuedToken> {
        let lifetime = i64::try_from(self.config.jwt_access_expiration_secs).unwrap_or(i64::MAX);
        let expires_at = Utc::now() + Duration::seconds(lifetime);

        let claims = Claims::new_access(
            user.id,
            user.name.clone(),
            user.email.as_str().to_string(),
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| PodhubError::Internal(format!("Failed to generate access token: {e}")))?;

        debug!("Generated access token for user {}", user.id);
        Ok(IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_at: claims.exp,
        })
    }

    /// Validates a token and returns the claims.
    pub fn validate_token(&self, token: &str) -> PodhubResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Token validation failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => PodhubError::TokenExpired,
                    ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                        PodhubError::InvalidToken("Invalid token signature".to_string())
                    }
                    ErrorKind::InvalidIssuer => {
                        PodhubError::InvalidToken("Invalid token issuer".to_string())
                    }
                    ErrorKind::InvalidAudience => {
                        PodhubError::InvalidToken("Invalid token audience".to_string())
                    }
                    _ => PodhubError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podhub_core::Email;

    fn create_test_provider(expiration_secs: u64) -> TokenProvider {
        let config = SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_access_expiration_secs: expiration_secs,
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            ..Default::default()
        };
        TokenProvider::new(Arc::new(config))
    }

    fn user() -> User {
        User::new(
            "Ada".to_string(),
            Email::new("ada@example.com").unwrap(),
            "hash".to_string(),
        )
    }

    #[test]
    fn test_issue_and_validate() {
        let provider = create_test_provider(3600);
        let user = user();

        let issued = provider.issue(&user).unwrap();
        assert_eq!(issued.token_type, "Bearer");

        let claims = provider.validate_token(&issued.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn test_invalid_token() {
        let provider = create_test_provider(3600);
        assert!(matches!(
            provider.validate_token("invalid-token"),
            Err(PodhubError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issued = create_test_provider(3600).issue(&user()).unwrap();
        let other = TokenProvider::new(Arc::new(SecurityConfig {
            jwt_secret: "another-secret-key-that-is-long-enough".to_string(),
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            ..Default::default()
        }));
        assert!(other.validate_token(&issued.access_token).is_err());
    }
}
