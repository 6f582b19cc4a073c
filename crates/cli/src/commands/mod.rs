//! CLI subcommands.

pub mod migrate;
pub mod user;

use sqlx::PgPool;

use catalog_api::config::{self, ConfigError};
use catalog_api::db;

/// Errors shared by commands that need the database.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Database URL is missing.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the API database.
///
/// Resolves the URL exactly as the server does (`CATALOG_DATABASE_URL`,
/// then `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = config::database_url()?;

    tracing::info!("Connecting to catalog database...");
    Ok(db::create_pool(&database_url).await?)
}
