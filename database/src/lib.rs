//! SQLite record of threads the downstream pipeline has already used.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use threadpick_core::{CoreError, DatabaseError, ProcessedStore};
use tracing::{debug, info};


/// A row from the `processed_threads` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProcessedThread {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    pub processed_at: DateTime<Utc>,
}

pub struct Database {
    connection_string: String,
    pool: Option<SqlitePool>,
}

impl Database {
    pub fn new(connection_string: String) -> Self {
        Self {
            connection_string,
            pool: None,
        }
    }

    /// Opens the pool, creating the database file if it does not exist yet.
    pub async fn connect(&mut self) -> Result<(), CoreError> {
        let options = SqliteConnectOptions::from_str(&self.connection_string)
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        info!("Connected to processed-thread store at {}", self.connection_string);
        self.pool = Some(pool);
        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<(), CoreError> {
        sqlx::migrate!("./migrations")
            .run(self.pool()?)
            .await
            .map_err(|e| DatabaseError::MigrationFailed {
                migration: e.to_string(),
            })?;
        Ok(())
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }

    pub async fn is_processed(&self, thread_id: &str) -> Result<bool, CoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT id FROM processed_threads WHERE id = ?")
                .bind(thread_id)
                .fetch_optional(self.pool()?)
                .await
                .map_err(query_error)?;
        Ok(row.is_some())
    }

    /// Records a thread as used. Marking the same id twice keeps the first record.
    pub async fn mark_processed(
        &self,
        thread_id: &str,
        subreddit: &str,
        title: &str,
    ) -> Result<(), CoreError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO processed_threads (id, subreddit, title, processed_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(thread_id)
        .bind(subreddit)
        .bind(title)
        .bind(Utc::now())
        .execute(self.pool()?)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            debug!("Thread {} was already marked as processed", thread_id);
        }
        Ok(())
    }

    /// Every processed thread, most recent first.
    pub async fn processed_threads(&self) -> Result<Vec<ProcessedThread>, CoreError> {
        let rows = sqlx::query_as::<_, ProcessedThread>(
            "SELECT id, subreddit, title, processed_at \
             FROM processed_threads \
             ORDER BY processed_at DESC",
        )
        .fetch_all(self.pool()?)
        .await
        .map_err(query_error)?;
        Ok(rows)
    }

    fn pool(&self) -> Result<&SqlitePool, DatabaseError> {
        self.pool.as_ref().ok_or(DatabaseError::NotConnected)
    }
}

/// SQLite reports a busy database with result code 5.
fn query_error(e: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("5") {
            return DatabaseError::DatabaseLocked;
        }
    }
    DatabaseError::Sql(e)
}

impl ProcessedStore for Database {
    async fn is_processed(&self, thread_id: &str) -> Result<bool, CoreError> {
        Database::is_processed(self, thread_id).await
    }
}
