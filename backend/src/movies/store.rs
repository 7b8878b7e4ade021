//! Movie document store
//!
//! `MovieStore` is the seam the HTTP layer talks to. `SqliteMovieStore` keeps
//! the collection as JSON documents in a single SQLite table.

use crate::error::AppError;
use crate::movies::models::Movie;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Read access to the movie collection
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Return at most `limit` movies in collection order
    async fn list_movies(&self, limit: u32) -> Result<Vec<Movie>, AppError>;
}

/// SQLite-backed movie collection
pub struct SqliteMovieStore {
    pool: SqlitePool,
}

impl SqliteMovieStore {
    /// Open (or create) the collection
    ///
    /// # Arguments
    /// * `database_url` - sqlx connection string or plain file path
    ///
    /// # Returns
    /// * `Ok(SqliteMovieStore)` if successful
    /// * `Err(AppError)` if connection or migration failed
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        // SQLite connection string format: sqlite:path/to/db.db
        let connection_string = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite:{}", database_url)
        };

        let path = connection_string
            .trim_start_matches("sqlite:")
            .trim_start_matches("//");
        let in_memory = path.starts_with(":memory:");

        // Ensure parent directory exists
        if !in_memory {
            if let Some(parent) = PathBuf::from(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                    })?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        // Every in-memory connection is its own database, so keep exactly one alive
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to movie store at: {}", database_url);

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        let migration_sql = include_str!("../../migrations/001_create_movies.sql");

        // Drop comments, then run statement by statement
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = match trimmed.find("--") {
                Some(comment_pos) => &trimmed[..comment_pos],
                None => trimmed,
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        for statement in cleaned_sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        debug!("Movie store migrations completed");
        Ok(())
    }

    /// Insert a raw document into the collection
    ///
    /// # Returns
    /// * `Ok(i64)` - row id of the inserted document
    pub async fn insert_document(&self, document: &Value) -> Result<i64, AppError> {
        if !document.is_object() {
            return Err(AppError::InvalidRequest(
                "Movie document must be a JSON object".to_string(),
            ));
        }

        let result = sqlx::query("INSERT INTO movies (document) VALUES (?)")
            .bind(document.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to insert movie: {}", e)))?;

        Ok(result.last_insert_rowid())
    }

    /// Number of documents in the collection
    pub async fn count(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM movies")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to count movies: {}", e)))?;

        Ok(row.get("count"))
    }
}

#[async_trait]
impl MovieStore for SqliteMovieStore {
    async fn list_movies(&self, limit: u32) -> Result<Vec<Movie>, AppError> {
        let rows = sqlx::query("SELECT document FROM movies ORDER BY id LIMIT ?")
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch movies: {}", e)))?;

        rows.iter()
            .map(|row| -> Result<Movie, AppError> {
                let raw: String = row.get("document");
                let document: Value = serde_json::from_str(&raw).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Stored movie is not valid JSON: {}", e))
                })?;
                Ok(Movie::from_document(&document))
            })
            .collect()
    }
}
