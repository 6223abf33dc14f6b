//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. The API layer maps these
//! variants onto HTTP status codes in [`crate::api::error`].

use thiserror::Error;

/// Application error type shared by the core, config, and auth layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is incomplete
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field of a request failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field (camelCase, as sent by clients)
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// A monetary amount was zero, negative, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A month string did not match `YYYY-MM`
    #[error("Invalid month '{value}': expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input
        value: String,
    },

    /// The record does not exist or belongs to another user
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier used for the lookup
        id: String,
    },

    /// Authentication failed or the account is not allowed in
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Why the request was rejected
        reason: String,
    },

    /// The identity provider returned something unusable
    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    /// Outbound HTTP failure while talking to the identity provider
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JWT signing or decoding failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] keyed by a numeric id.
    #[must_use]
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
