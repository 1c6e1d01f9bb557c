use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::shared::config::{self, Config};
use crate::shared::data::{db, migration_runner};
use crate::system::auth::jwt;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub jwt_secret: Arc<String>,
}

impl AppState {
    /// Open the configured database, migrate it and load the session signing secret
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        let db_path = config::get_database_path(&config);
        migration_runner::run_migrations(&db_path).await?;
        let db = db::connect(&db_path).await?;

        let jwt_secret = jwt::load_or_create_secret(&db).await?;

        Ok(Self {
            db,
            config: Arc::new(config),
            jwt_secret: Arc::new(jwt_secret),
        })
    }
}
