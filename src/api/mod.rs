//! HTTP API - axum routers and handlers over the core business logic.
//!
//! Handlers stay thin: extract, call into [`crate::core`], wrap the result in the
//! JSON envelope clients expect.

/// Google sign-in, current user, logout
pub mod auth;
/// Monthly calculation report
pub mod calculations;
/// Account credit CRUD
pub mod credits;
/// Error-to-response mapping and extractors
pub mod error;
/// Expense CRUD, filters, categories
pub mod expenses;
/// Liveness check
pub mod health;
/// Income CRUD, summaries, inheritance
pub mod income;
/// Bearer token check
pub mod middleware;
/// Per-user settings
pub mod settings;

use crate::{
    auth::{AuthManager, provider::IdentityProvider},
    config::app::AppConfig,
    errors::{Error, Result},
};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state handed to every handler.
pub struct AppState {
    /// Database handle
    pub db: DatabaseConnection,
    /// Token issuing and allowlist
    pub auth: AuthManager,
    /// Sign-in provider
    pub identity: Arc<dyn IdentityProvider>,
    /// Loaded server config
    pub config: AppConfig,
}

fn cors_layer(frontend_url: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(frontend_url).map_err(|e| Error::Config {
        message: format!("Invalid frontend_url '{frontend_url}': {e}"),
    })?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

/// Builds the full `/api` router.
///
/// # Errors
/// Returns an error if the configured frontend URL is not a valid origin.
pub fn app_router(state: Arc<AppState>) -> Result<Router> {
    let cors = cors_layer(&state.config.frontend_url)?;

    let protected = Router::new()
        .merge(auth::protected_router())
        .merge(expenses::router())
        .merge(income::router())
        .merge(credits::router())
        .merge(settings::router())
        .merge(calculations::router())
        .route_layer(from_fn_with_state(
            Arc::clone(&state),
            middleware::require_auth,
        ));

    let api = Router::new()
        .merge(health::router())
        .merge(auth::public_router())
        .merge(protected);

    Ok(Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
