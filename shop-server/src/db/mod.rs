//! SQLite storage
//!
//! [`DbService`] opens the pool and runs the embedded migrations;
//! [`repository`] holds the per-table queries.

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Writers wait this long for the lock instead of failing with SQLITE_BUSY
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

const POOL_SIZE: u32 = 5;

/// Owns the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (creating if needed) the database file in WAL mode and migrate it
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = parse_url(&format!("sqlite:{db_path}"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT)
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(POOL_SIZE)
            .connect_with(options)
            .await
            .map_err(open_failed)?;

        tracing::info!(
            path = %db_path,
            pool_size = POOL_SIZE,
            busy_timeout_ms = BUSY_TIMEOUT.as_millis() as u64,
            "Database opened (WAL)"
        );
        Self::migrated(pool).await
    }

    /// Private in-memory database (tests, tooling)
    ///
    /// Each `sqlite::memory:` connection is a separate database, so the pool
    /// holds exactly one connection and never recycles it.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(parse_url("sqlite::memory:")?)
            .await
            .map_err(open_failed)?;
        Self::migrated(pool).await
    }

    async fn migrated(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::debug!("Database migrations applied");
        Ok(Self { pool })
    }
}

// foreign_keys is per connection, so it lives in the connect options
fn parse_url(url: &str) -> Result<SqliteConnectOptions, AppError> {
    SqliteConnectOptions::from_str(url)
        .map(|options| options.foreign_keys(true))
        .map_err(|e| AppError::database(format!("Invalid database path: {e}")))
}

fn open_failed(e: sqlx::Error) -> AppError {
    AppError::database(format!("Failed to open database: {e}"))
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    DbService::in_memory().await.unwrap().pool
}
