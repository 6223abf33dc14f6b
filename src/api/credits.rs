use crate::{
    api::{
        AppState,
        error::{ApiResult, AppJson, AppPath, AppQuery},
    },
    auth::AuthUser,
    core::{
        credit::{self, CreditUpdate, NewCredit},
        month::Month,
    },
    errors::Error,
};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct MonthQuery {
    month: Option<Month>,
}

async fn list_credits(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppQuery(query): AppQuery<MonthQuery>,
) -> ApiResult<Json<Value>> {
    let credits = credit::get_credits(&state.db, user.id, query.month.as_ref()).await?;
    Ok(Json(json!({ "credits": credits })))
}

async fn get_credit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Value>> {
    let credit = credit::get_credit_by_id(&state.db, user.id, id)
        .await?
        .ok_or_else(|| Error::not_found("Account credit", id))?;
    Ok(Json(json!({ "credit": credit })))
}

async fn create_credit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(input): AppJson<NewCredit>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let credit = credit::create_credit(&state.db, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "credit": credit }))))
}

async fn update_credit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
    AppJson(update): AppJson<CreditUpdate>,
) -> ApiResult<Json<Value>> {
    let credit = credit::update_credit(&state.db, user.id, id, update).await?;
    Ok(Json(json!({ "credit": credit })))
}

async fn delete_credit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Value>> {
    let credit = credit::delete_credit(&state.db, user.id, id).await?;
    Ok(Json(json!({
        "message": "Account credit deleted successfully",
        "credit": credit
    })))
}

/// Account credit routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/account-credits", get(list_credits).post(create_credit))
        .route(
            "/account-credits/{id}",
            get(get_credit).put(update_credit).delete(delete_credit),
        )
}
