use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::path::Path;
use uuid::Uuid;

/// Build a sqlite URL that creates the file when missing
pub fn build_sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// URL of the database file; creates its directory if needed
pub fn database_url(db_file: &Path) -> anyhow::Result<String> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    Ok(build_sqlite_url(&absolute_path))
}

/// Open the database file through sea-orm
pub async fn connect(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    let db_url = database_url(db_file)?;
    tracing::info!("Opening database {}", db_url);

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .context("Failed to connect to database")?;
    Ok(conn)
}

/// Whether the error chain carries a unique constraint violation from the store
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<DbErr>())
        .any(|e| matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))))
}

/// Read a stored id; an unparsable value is logged and read as the nil id
pub fn parse_stored_uuid(table: &str, column: &str, raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or_else(|e| {
        tracing::warn!("{}.{} holds invalid id '{}': {}", table, column, raw, e);
        Uuid::nil()
    })
}
