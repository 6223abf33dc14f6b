/// Server settings from config.toml and the environment
pub mod app;

/// OAuth and token settings from environment variables
pub mod auth;

/// Database connection and schema creation
pub mod database;
