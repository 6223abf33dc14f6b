use dotenvy::dotenv;
use household_split::{
    api::{self, AppState},
    auth::{AuthManager, provider::GoogleProvider},
    config::{self, auth::AuthConfig},
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load configuration
    let app_config = config::app::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;
    let auth_config = AuthConfig::from_env()
        .inspect_err(|e| error!("Failed to load auth configuration: {}", e))?;

    // 4. Initialize database
    let db = config::database::init_database(&app_config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Build the router
    let state = Arc::new(AppState {
        db,
        auth: AuthManager::new(&auth_config, app_config.token_ttl_days),
        identity: Arc::new(GoogleProvider::new(auth_config.google.clone())),
        config: app_config.clone(),
    });
    let router = api::app_router(state)?;

    // 6. Serve until Ctrl-C
    let listener = tokio::net::TcpListener::bind(&app_config.listen_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.listen_addr, e))?;
    info!(addr = %app_config.listen_addr, "Server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
