pub mod schema;

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tracing::info;

/// Self-hosted bookmark database (SQLite or Postgres, picked by the url scheme).
#[derive(Clone)]
pub struct Db {
    pub pool: AnyPool,
}

impl Db {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await?;

        let backend = database_url.split(':').next().unwrap_or_default();
        info!(backend, "bookmark database connected");
        Ok(Self { pool })
    }

    /// Creates the bookmarks table and its owner index when missing.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        schema::migrate(&self.pool).await
    }
}
