//! Mapping from crate errors to HTTP responses, plus extractors whose rejections
//! use the same JSON error shape.

use crate::errors::Error;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by every handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure from the core, config or auth layers
    #[error(transparent)]
    Core(#[from] Error),
    /// The request could not be decoded at all
    #[error("Invalid {field}: {message}")]
    BadRequest {
        /// Which part of the request: `body`, `query` or `path`
        field: &'static str,
        /// The extractor's rejection text
        message: String,
    },
}

/// Handler return type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct FieldError {
    field: String,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

impl ErrorBody {
    fn plain(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }

    fn field(error: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody::field("Invalid request", field, message),
            ),
            Self::Core(e) => match e {
                Error::Validation { field, message } => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::field(message.clone(), field, message),
                ),
                Error::InvalidAmount { amount } => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::field(
                        "Amount must be positive",
                        "amount",
                        format!("{amount} is not a positive amount"),
                    ),
                ),
                Error::InvalidMonth { value } => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::field(
                        "Month must be in YYYY-MM format",
                        "month",
                        format!("'{value}' is not a valid month"),
                    ),
                ),
                Error::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    ErrorBody::plain(format!("{entity} not found")),
                ),
                Error::Unauthorized { reason } => {
                    warn!(%reason, "Rejected request");
                    (StatusCode::UNAUTHORIZED, ErrorBody::plain("Unauthorized"))
                }
                other => {
                    error!(error = %other, "Request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorBody::plain("Internal server error"),
                    )
                }
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            field: "body",
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest {
            field: "query",
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest {
            field: "path",
            message: rejection.body_text(),
        }
    }
}

/// `Json` whose rejection is an [`ApiError`] (400) instead of axum's 422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejection is an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// `Path` whose rejection is an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
