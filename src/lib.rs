//! Campus Coffee user management service
//!
//! A REST service for creating, reading, updating and deleting users of the
//! Campus Coffee platform, backed by either an in-memory store or PostgreSQL.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    storage::{run_storage_migrations, StorageConfig},
    user::{InMemoryUserRepository, PostgresUserRepository, UserService},
};
use tracing::info;

/// Create the application state with the default (in-memory) configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let state = match StorageConfig::from_settings(&config.storage)? {
        StorageConfig::InMemory => {
            info!("Using in-memory user store");
            let repository = Arc::new(InMemoryUserRepository::new());
            AppState::new(Arc::new(UserService::new(repository)))
        }
        StorageConfig::Postgres(pg_config) => {
            info!("Connecting to PostgreSQL...");
            let pool = pg_config.connect().await?;
            info!("PostgreSQL connection established");

            if let Some(version) = run_storage_migrations(&pool).await? {
                info!(version, "Storage schema up to date");
            }

            let repository = Arc::new(PostgresUserRepository::new(pool));
            AppState::new(Arc::new(UserService::new(repository)))
        }
    };

    Ok(state)
}
