//! Authentication settings loaded from environment variables.
//!
//! Secrets never live in config.toml; they come from the process environment (or
//! `.env`, loaded at startup).

use crate::errors::{Error, Result};
use tracing::warn;

/// Default OAuth redirect target for a locally running server.
pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/api/auth/google/callback";

/// Google OAuth client credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleOAuthConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with Google
    pub callback_url: String,
}

/// Everything the auth layer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    /// Google client credentials
    pub google: GoogleOAuthConfig,
    /// Emails allowed to sign in, lowercased. Empty allows everyone.
    pub authorized_emails: Vec<String>,
}

impl AuthConfig {
    /// Reads `JWT_SECRET`, `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`,
    /// `GOOGLE_CALLBACK_URL` and `AUTHORIZED_EMAILS`.
    ///
    /// # Errors
    /// Returns an error if `JWT_SECRET` is missing or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("JWT_SECRET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config {
                message: "JWT_SECRET must be set".to_string(),
            })?;

        let client_id = lookup("GOOGLE_CLIENT_ID").unwrap_or_default();
        let client_secret = lookup("GOOGLE_CLIENT_SECRET").unwrap_or_default();
        if client_id.is_empty() || client_secret.is_empty() {
            warn!("GOOGLE_CLIENT_ID or GOOGLE_CLIENT_SECRET not set, Google sign-in will fail");
        }

        let authorized_emails = lookup("AUTHORIZED_EMAILS")
            .map(|raw| parse_email_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            jwt_secret,
            google: GoogleOAuthConfig {
                client_id,
                client_secret,
                callback_url: lookup("GOOGLE_CALLBACK_URL")
                    .unwrap_or_else(|| DEFAULT_CALLBACK_URL.to_string()),
            },
            authorized_emails,
        })
    }
}

fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_requires_jwt_secret() {
        assert!(matches!(
            AuthConfig::from_lookup(lookup_from(&[])),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            AuthConfig::from_lookup(lookup_from(&[("JWT_SECRET", "   ")])),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_reads_all_values() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "secret"),
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "shh"),
            ("AUTHORIZED_EMAILS", " Alex@Example.com, ,sam@example.com "),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, "secret");
        assert_eq!(config.google.client_id, "id");
        assert_eq!(config.google.callback_url, DEFAULT_CALLBACK_URL);
        assert_eq!(
            config.authorized_emails,
            vec!["alex@example.com".to_string(), "sam@example.com".to_string()]
        );
    }
}
