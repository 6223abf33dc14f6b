//! Bearer-token authentication.
//!
//! After a successful OAuth callback the server signs an HS256 token naming the
//! user; protected routes decode it back into an [`AuthUser`].

/// Identity provider trait and the Google implementation
pub mod provider;

use crate::{
    config::auth::AuthConfig,
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Email at sign-in time
    pub email: String,
    /// Issued at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
}

/// The authenticated caller, as placed in request extensions by the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User id
    pub id: i64,
    /// Email carried in the token
    pub email: String,
}

/// Issues and validates bearer tokens, and applies the sign-in allowlist.
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
    authorized_emails: Vec<String>,
}

impl AuthManager {
    /// Builds a manager signing with `config.jwt_secret`; tokens live `token_ttl_days`.
    #[must_use]
    pub fn new(config: &AuthConfig, token_ttl_days: i64) -> Self {
        let secret = config.jwt_secret.as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl: Duration::try_days(token_ttl_days).unwrap_or(Duration::MAX),
            authorized_emails: config.authorized_emails.clone(),
        }
    }

    /// Signs a token for `user_id`.
    pub fn issue_token(&self, user_id: i64, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.token_ttl)
                .ok_or_else(|| Error::Config {
                    message: "Token lifetime overflows the calendar".to_string(),
                })?
                .timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Decodes and checks a token, returning the caller it names.
    ///
    /// # Errors
    /// [`Error::Unauthorized`] for anything expired, tampered with or malformed.
    pub fn validate_token(&self, token: &str) -> Result<AuthUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            Error::Unauthorized {
                reason: format!("Invalid token: {e}"),
            }
        })?;
        let id = data.claims.sub.parse().map_err(|_| Error::Unauthorized {
            reason: "Token subject is not a user id".to_string(),
        })?;
        Ok(AuthUser {
            id,
            email: data.claims.email,
        })
    }

    /// Whether `email` may sign in. An empty allowlist admits everyone.
    #[must_use]
    pub fn is_email_authorized(&self, email: &str) -> bool {
        self.authorized_emails.is_empty()
            || self
                .authorized_emails
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(email.trim()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::auth::GoogleOAuthConfig;

    fn manager(emails: &[&str]) -> AuthManager {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            google: GoogleOAuthConfig::default(),
            authorized_emails: emails.iter().map(|e| (*e).to_string()).collect(),
        };
        AuthManager::new(&config, 7)
    }

    #[test]
    fn test_token_round_trip() {
        let auth = manager(&[]);
        let token = auth.issue_token(42, "a@example.com").unwrap();
        let user = auth.validate_token(&token).unwrap();
        assert_eq!(
            user,
            AuthUser {
                id: 42,
                email: "a@example.com".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_foreign_and_garbage_tokens() {
        let token = manager(&[]).issue_token(1, "a@example.com").unwrap();
        let other = AuthManager::new(
            &AuthConfig {
                jwt_secret: "different".to_string(),
                google: GoogleOAuthConfig::default(),
                authorized_emails: Vec::new(),
            },
            7,
        );
        assert!(matches!(other.validate_token(&token), Err(Error::Unauthorized { .. })));
        assert!(matches!(
            other.validate_token("not.a.token"),
            Err(Error::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_rejects_expired_token() {
        let auth = manager(&[]);
        let claims = Claims {
            sub: "1".to_string(),
            email: "a@example.com".to_string(),
            iat: 0,
            exp: 1,
        };
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();
        assert!(auth.validate_token(&token).is_err());
    }

    #[test]
    fn test_oversized_ttl_errors_instead_of_panicking() {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            google: GoogleOAuthConfig::default(),
            authorized_emails: Vec::new(),
        };
        for days in [100_000_000, i64::MAX] {
            let auth = AuthManager::new(&config, days);
            assert!(matches!(
                auth.issue_token(1, "a@example.com"),
                Err(Error::Config { .. })
            ));
        }
    }

    #[test]
    fn test_email_allowlist() {
        assert!(manager(&[]).is_email_authorized("anyone@example.com"));

        let auth = manager(&["alex@example.com"]);
        assert!(auth.is_email_authorized("Alex@Example.com"));
        assert!(!auth.is_email_authorized("sam@example.com"));
    }
}
