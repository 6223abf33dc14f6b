use crate::{
    api::{
        AppState,
        error::{ApiResult, AppJson},
    },
    auth::AuthUser,
    core::settings::{self, SettingsUpdate},
};
use axum::{Extension, Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let settings = settings::get_settings(&state.db, user.id).await?;
    Ok(Json(json!({ "settings": settings })))
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(update): AppJson<SettingsUpdate>,
) -> ApiResult<Json<Value>> {
    let settings = settings::update_settings(&state.db, user.id, update).await?;
    Ok(Json(json!({ "settings": settings })))
}

/// Settings routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}
