//! Connection pool and schema bootstrap.

mod schema;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use crate::error::ServiceResult;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://blood_bank.db?mode=rwc";

/// Where the relational store lives and how many connections to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 1,
        }
    }
}

impl DatabaseConfig {
    /// A private in-memory database, used by tests.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Open the pool with foreign keys enforced.
///
/// An in-memory database exists only as long as its connection, so it is
/// pinned to a single connection that is never recycled. File databases run
/// in WAL mode so readers do not block the single writer.
#[instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn connect(config: &DatabaseConfig) -> ServiceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(
                options
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal),
            )
            .await?
    };

    info!(in_memory = config.is_in_memory(), "database pool opened");
    Ok(pool)
}

/// Create every table and index that does not exist yet.
#[instrument(skip(pool))]
pub async fn migrate(pool: &SqlitePool) -> ServiceResult<()> {
    for statement in schema::STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!(statements = schema::STATEMENTS.len(), "schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_file() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url, DEFAULT_DATABASE_URL);
        assert!(!config.is_in_memory());
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let pool = connect(&DatabaseConfig::in_memory()).await.unwrap();
        migrate(&pool).await.unwrap();
        migrate(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
             ('donors', 'recipients', 'donations', 'blood_requests', 'blood_inventory')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 5);
    }
}
