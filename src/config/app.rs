//! Application configuration loading from config.toml
//!
//! Every field has a default, so the file is optional. A handful of environment
//! variables override whatever the file says.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Upper bound on `token_ttl_days`, ten years.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

/// Server settings read from config.toml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// `SeaORM` connection string
    pub database_url: String,
    /// Browser app origin; used for CORS and login redirects
    pub frontend_url: String,
    /// Lifetime of issued bearer tokens
    pub token_ttl_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            token_ttl_days: 7,
        }
    }
}

impl AppConfig {
    /// Replaces fields with values from `LISTEN_ADDR`, `DATABASE_URL` and
    /// `FRONTEND_URL` when those are set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("LISTEN_ADDR") {
            self.listen_addr = v;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = lookup("FRONTEND_URL") {
            self.frontend_url = v;
        }
        self
    }

    /// Checks field ranges and strips any trailing `/` from `frontend_url`.
    ///
    /// # Errors
    /// [`Error::Config`] if `token_ttl_days` is outside `1..=MAX_TOKEN_TTL_DAYS`.
    pub fn validate(mut self) -> Result<Self> {
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&self.token_ttl_days) {
            return Err(Error::Config {
                message: format!(
                    "token_ttl_days must be between 1 and {MAX_TOKEN_TTL_DAYS}, got {}",
                    self.token_ttl_days
                ),
            });
        }
        self.frontend_url = self.frontend_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()
}

/// Loads configuration from `path`. A missing file yields the defaults.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The TOML syntax is invalid or has unknown keys
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(?path, "No config file, using defaults");
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `CONFIG_PATH` (default `./config.toml`) and applies
/// environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = load_config(&path)?.with_env_overrides().validate()?;
    info!(
        listen_addr = %config.listen_addr,
        frontend_url = %config.frontend_url,
        "Configuration loaded"
    );
    Ok(config)
}
