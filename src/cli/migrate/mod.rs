//! Migrate command - applies the PostgreSQL schema and exits

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{run_storage_migrations, StorageConfig};

/// Apply pending migrations against the configured database
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    let pg_config = match StorageConfig::from_settings(&config.storage)? {
        StorageConfig::Postgres(pg_config) => pg_config,
        StorageConfig::InMemory => {
            anyhow::bail!("Migrations require the postgres storage backend")
        }
    };

    let pool = pg_config.connect().await?;
    let version = run_storage_migrations(&pool).await?;

    match version {
        Some(version) => info!(version, "Migrations applied"),
        None => info!("No migrations applied"),
    }

    pool.close().await;

    Ok(())
}
