use crate::{
    api::{
        AppState,
        error::{ApiResult, AppJson, AppPath, AppQuery},
    },
    auth::AuthUser,
    core::{
        credit,
        income::{self, IncomeUpdate, NewIncome},
        month::Month,
    },
    errors::Error,
};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct MonthQuery {
    month: Option<Month>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ApplyRequest {
    month: Month,
}

async fn list_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppQuery(query): AppQuery<MonthQuery>,
) -> ApiResult<Json<Value>> {
    let income = income::get_income(&state.db, user.id, query.month.as_ref()).await?;
    Ok(Json(json!({ "income": income })))
}

async fn get_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Value>> {
    let income = income::get_income_by_id(&state.db, user.id, id)
        .await?
        .ok_or_else(|| Error::not_found("Income record", id))?;
    Ok(Json(json!({ "income": income })))
}

async fn create_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(input): AppJson<NewIncome>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let income = income::create_income(&state.db, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "income": income }))))
}

async fn update_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
    AppJson(update): AppJson<IncomeUpdate>,
) -> ApiResult<Json<Value>> {
    let income = income::update_income(&state.db, user.id, id, update).await?;
    Ok(Json(json!({ "income": income })))
}

async fn delete_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Value>> {
    let income = income::delete_income(&state.db, user.id, id).await?;
    Ok(Json(json!({
        "message": "Income deleted successfully",
        "income": income
    })))
}

async fn month_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(month): AppPath<String>,
) -> ApiResult<Json<income::MonthSummary>> {
    let month: Month = month.parse()?;
    Ok(Json(income::get_month_summary(&state.db, user.id, &month).await?))
}

async fn apply_inherited(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let income = income::apply_inherited_income(&state.db, user.id, &request.month).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Inherited income applied successfully",
            "income": income
        })),
    ))
}

/// Applies both inheritable ledgers for the month.
async fn apply_all_inherited(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let income = income::apply_inherited_income(&state.db, user.id, &request.month).await?;
    let credits = credit::apply_inherited_credits(&state.db, user.id, &request.month).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Inherited income and credits applied successfully",
            "income": income,
            "credits": credits
        })),
    ))
}

/// Income routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/income", get(list_income).post(create_income))
        .route("/income/summary/{month}", get(month_summary))
        .route("/income/apply-inherited", post(apply_inherited))
        .route("/income/apply-all-inherited", post(apply_all_inherited))
        .route(
            "/income/{id}",
            get(get_income).put(update_income).delete(delete_income),
        )
}
