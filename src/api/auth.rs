//! Sign-in flow: redirect to the identity provider, handle its callback, hand the
//! browser a bearer token.

use crate::{
    api::{
        AppState,
        error::{ApiResult, AppQuery},
    },
    auth::AuthUser,
    core::user::{find_or_create_user, get_user_by_id},
    errors::{Error, Result},
};
use axum::{
    Extension, Json, Router,
    extract::State,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

async fn google_login(State(state): State<Arc<AppState>>) -> ApiResult<Redirect> {
    let url = state.identity.authorization_url()?;
    Ok(Redirect::to(&url))
}

async fn complete_login(state: &AppState, params: CallbackParams) -> Result<String> {
    if let Some(error) = params.error {
        return Err(Error::IdentityProvider(format!("Provider returned error: {error}")));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| Error::IdentityProvider("Callback without code".to_string()))?;

    let profile = state.identity.fetch_profile(&code).await?;
    if !state.auth.is_email_authorized(&profile.email) {
        return Err(Error::Unauthorized {
            reason: format!("{} is not on the allowlist", profile.email),
        });
    }

    let (user, created) = find_or_create_user(&state.db, &profile).await?;
    info!(user_id = user.id, created, "User signed in");
    state.auth.issue_token(user.id, &user.email)
}

#[instrument(skip_all)]
async fn google_callback(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<CallbackParams>,
) -> Redirect {
    let frontend = &state.config.frontend_url;
    match complete_login(&state, params).await {
        Ok(token) => Redirect::to(&format!("{frontend}/auth/callback?token={token}")),
        Err(e) => {
            let code = match &e {
                Error::IdentityProvider(_) => "auth_failed",
                Error::Unauthorized { .. } => "unauthorized",
                _ => "server_error",
            };
            warn!(error = %e, code, "Sign-in failed");
            Redirect::to(&format!("{frontend}/login?error={code}"))
        }
    }
}

async fn me(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let user = get_user_by_id(&state.db, caller.id)
        .await?
        .ok_or_else(|| Error::not_found("User", caller.id))?;
    Ok(Json(json!({
        "user": { "id": user.id, "email": user.email, "name": user.name }
    })))
}

async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out successfully" }))
}

/// Routes reachable without a token.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
}

/// Routes that need a token.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}
