use crate::{
    api::{AppState, error::ApiError},
    errors::Error,
};
use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

fn unauthorized(reason: &str) -> ApiError {
    Error::Unauthorized {
        reason: reason.to_string(),
    }
    .into()
}

/// Rejects requests without a valid bearer token and stores the caller's
/// [`crate::auth::AuthUser`] in the request extensions.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(unauthorized("Malformed Authorization header"));
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(unauthorized("Authorization scheme is not Bearer"));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(unauthorized("Empty bearer token"));
    }

    let user = state.auth.validate_token(token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
