use anyhow::Context;
use sqlx::sqlite::SqlitePool;
use std::path::Path;

use super::db;

/// Apply the embedded SQL migrations (`crates/backend/migrations`) to the database file
pub async fn run_migrations(db_file: &Path) -> anyhow::Result<()> {
    let db_url = db::database_url(db_file)?;
    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to open database for migrations")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply database migrations")?;
    pool.close().await;

    tracing::info!("Database migrations applied successfully");
    Ok(())
}
