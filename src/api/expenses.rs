use crate::{
    api::{
        AppState,
        error::{ApiResult, AppJson, AppPath, AppQuery},
    },
    auth::AuthUser,
    core::expense::{self, ExpenseFilters, ExpenseUpdate, NewExpense},
    errors::Error,
};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;

async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppQuery(filters): AppQuery<ExpenseFilters>,
) -> ApiResult<Json<Value>> {
    let expenses = expense::list_expenses(&state.db, user.id, &filters).await?;
    Ok(Json(json!({ "expenses": expenses })))
}

async fn get_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let categories = expense::get_categories(&state.db, user.id).await?;
    Ok(Json(json!({ "categories": categories })))
}

async fn get_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Value>> {
    let expense = expense::get_expense_by_id(&state.db, user.id, id)
        .await?
        .ok_or_else(|| Error::not_found("Expense", id))?;
    Ok(Json(json!({ "expense": expense })))
}

async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(input): AppJson<NewExpense>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let expense = expense::create_expense(&state.db, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "expense": expense }))))
}

async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
    AppJson(update): AppJson<ExpenseUpdate>,
) -> ApiResult<Json<Value>> {
    let expense = expense::update_expense(&state.db, user.id, id, update).await?;
    Ok(Json(json!({ "expense": expense })))
}

async fn archive_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Value>> {
    let expense = expense::archive_expense(&state.db, user.id, id).await?;
    Ok(Json(json!({
        "message": "Expense archived successfully",
        "expense": expense
    })))
}

/// Expense routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/categories", get(get_categories))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(archive_expense),
        )
}
