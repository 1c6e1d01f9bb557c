use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use super::{db, migration_runner};

/// Fresh migrated database in a temporary directory; keep the `TempDir` alive
pub async fn test_db() -> (TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().unwrap();
    let db_file = dir.path().join("test.db");
    migration_runner::run_migrations(&db_file).await.unwrap();
    let conn = db::connect(&db_file).await.unwrap();
    (dir, conn)
}
