use crate::{
    api::{
        AppState,
        error::{ApiResult, AppPath},
    },
    auth::AuthUser,
    core::{calculation, month::Month},
};
use axum::{Extension, Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

async fn month_calculations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(month): AppPath<String>,
) -> ApiResult<Json<Value>> {
    // Parsed here rather than by the extractor so a bad month reports as `month`.
    let month: Month = month.parse()?;
    let calculations = calculation::get_month_calculations(&state.db, user.id, &month).await?;
    Ok(Json(json!({ "calculations": calculations })))
}

/// Calculation routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/calculations/{month}", get(month_calculations))
}
