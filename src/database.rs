use std::str::FromStr;

use serde::Deserialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to parse the database url: {0}")]
    Url(#[source] sqlx::Error),
    #[error("Failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to run database migrations: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Database section of the server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite url, e.g. `sqlite://bookstore.db` or `sqlite::memory:`.
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        5
    }
}

/// A handle to the connection pool.
///
/// Opening the database creates the file if it is missing and brings the
/// schema up to date with the embedded migrations.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    #[tracing::instrument(skip_all, fields(url = %config.url))]
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(DatabaseError::Url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(DatabaseError::Connect)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DatabaseError::Migrate)?;

        tracing::debug!("Database ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
