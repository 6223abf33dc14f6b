//! Identity providers - who vouches for a signed-in person.

use crate::{
    config::auth::GoogleOAuthConfig,
    core::user::ProviderProfile,
    errors::{Error, Result},
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// An OAuth-style identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start signing in.
    fn authorization_url(&self) -> Result<String>;

    /// Exchanges the callback `code` for the signed-in person's profile.
    ///
    /// # Errors
    /// [`Error::IdentityProvider`] when the code is rejected or the profile has no
    /// email; [`Error::Http`] when the provider cannot be reached.
    async fn fetch_profile(&self, code: &str) -> Result<ProviderProfile>;
}

/// Google OAuth 2.0 / OpenID Connect.
pub struct GoogleProvider {
    client: Client,
    config: GoogleOAuthConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
}

impl GoogleProvider {
    /// Creates a provider with its own HTTP client.
    #[must_use]
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorization_url(&self) -> Result<String> {
        let url = Url::parse_with_params(
            GOOGLE_AUTH_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
            ],
        )
        .map_err(|e| Error::IdentityProvider(format!("Invalid authorization URL: {e}")))?;
        Ok(url.into())
    }

    #[instrument(skip_all)]
    async fn fetch_profile(&self, code: &str) -> Result<ProviderProfile> {
        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::IdentityProvider(format!(
                "Token exchange returned {}",
                response.status()
            )));
        }
        let token: TokenResponse = response.json().await?;

        let response = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::IdentityProvider(format!(
                "Userinfo returned {}",
                response.status()
            )));
        }
        let info: UserInfo = response.json().await?;
        debug!(sub = %info.sub, "Fetched Google profile");

        let email = info
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::IdentityProvider("Profile has no email".to_string()))?;
        Ok(ProviderProfile {
            provider_id: info.sub,
            email,
            name: info.name,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_authorization_url_carries_client_and_scopes() {
        let provider = GoogleProvider::new(GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            callback_url: "http://localhost:3000/api/auth/google/callback".to_string(),
        });
        let url = Url::parse(&provider.authorization_url().unwrap()).unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(params.contains(&("client_id".to_string(), "client-123".to_string())));
        assert!(params.contains(&("scope".to_string(), "openid email profile".to_string())));
        assert!(params.contains(&("response_type".to_string(), "code".to_string())));
        // The secret never goes to the browser
        assert!(!params.iter().any(|(_, v)| v == "secret"));
    }
}
