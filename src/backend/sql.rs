//! SQL store adapters.
//!
//! # Responsibilities
//! - Count runnable rows in a relational job table
//! - Pick the variant matching the `DATABASE_URL` scheme
//!
//! # Design Decisions
//! - Lazy pools: construction never touches the database, the first count
//!   query connects
//! - One `SELECT COUNT(*)` per count; eligible means `failed_at IS NULL`
//!   and `run_at <= now` (inclusive), identical across variants
//! - Placeholder syntax is the only per-variant difference (`$1` vs `?`)
//! - Table names are restricted to `[A-Za-z0-9_]` because the identifier is
//!   spliced into the query text

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::{BackendError, QueueBackend};

const DEFAULT_TABLE: &str = "jobs";

/// Build a store adapter from `DATABASE_URL`, if set and usable.
///
/// The URL scheme selects the variant; schemes without a compiled-in
/// adapter are skipped with a warning.
pub fn from_env() -> Option<Arc<dyn QueueBackend>> {
    let raw = std::env::var("DATABASE_URL").ok()?;
    let parsed = match url::Url::parse(&raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::warn!(error = %error, "DATABASE_URL is set but unparsable, skipping sql backend");
            return None;
        }
    };
    match parsed.scheme() {
        #[cfg(feature = "postgres")]
        "postgres" | "postgresql" => arc_backend(PostgresQueue::from_url(&raw)),
        #[cfg(feature = "mysql")]
        "mysql" => arc_backend(MySqlQueue::from_url(&raw)),
        #[cfg(feature = "sqlite")]
        "sqlite" => arc_backend(SqliteQueue::from_url(&raw)),
        other => {
            tracing::warn!(scheme = other, "DATABASE_URL scheme has no queue adapter");
            None
        }
    }
}

fn arc_backend<B: QueueBackend + 'static>(
    built: Result<B, BackendError>,
) -> Option<Arc<dyn QueueBackend>> {
    match built {
        Ok(backend) => Some(Arc::new(backend)),
        Err(error) => {
            tracing::warn!(error = %error, "DATABASE_URL is set but unusable, skipping sql backend");
            None
        }
    }
}

fn valid_table(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn checked_table(name: &str) -> Result<String, BackendError> {
    if valid_table(name) {
        Ok(name.to_string())
    } else {
        Err(BackendError::Config(format!(
            "invalid job table name: {name:?}"
        )))
    }
}

fn count_sql(table: &str, placeholder: &str) -> String {
    format!("SELECT COUNT(*) FROM {table} WHERE failed_at IS NULL AND run_at <= {placeholder}")
}

fn clamp_count(raw: i64) -> u64 {
    raw.max(0) as u64
}

/// Store-backed queue counting rows in a PostgreSQL job table.
#[cfg(feature = "postgres")]
#[derive(Debug, Clone)]
pub struct PostgresQueue {
    pool: sqlx::PgPool,
    query: String,
}

#[cfg(feature = "postgres")]
impl PostgresQueue {
    /// Wrap an existing pool, counting the default `jobs` table.
    pub fn from_pool(pool: sqlx::PgPool) -> Self {
        Self {
            pool,
            query: count_sql(DEFAULT_TABLE, "$1"),
        }
    }

    /// Open a lazy pool for the database at `url`.
    pub fn from_url(url: &str) -> Result<Self, BackendError> {
        let pool = sqlx::PgPool::connect_lazy(url)
            .map_err(|e| BackendError::Config(format!("invalid postgres URL: {e}")))?;
        Ok(Self::from_pool(pool))
    }

    /// Count a different table (default `jobs`).
    pub fn with_table(mut self, table: &str) -> Result<Self, BackendError> {
        self.query = count_sql(&checked_table(table)?, "$1");
        Ok(self)
    }
}

#[cfg(feature = "postgres")]
#[async_trait]
impl QueueBackend for PostgresQueue {
    fn queue_name(&self) -> &'static str {
        "job-table"
    }

    fn store_name(&self) -> &'static str {
        "PostgreSQL"
    }

    async fn pending(&self) -> Result<u64, BackendError> {
        let eligible: i64 = sqlx::query_scalar(&self.query)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BackendError::Query(format!("postgres count failed: {e}")))?;
        Ok(clamp_count(eligible))
    }
}

/// Store-backed queue counting rows in a MySQL job table.
#[cfg(feature = "mysql")]
#[derive(Debug, Clone)]
pub struct MySqlQueue {
    pool: sqlx::MySqlPool,
    query: String,
}

#[cfg(feature = "mysql")]
impl MySqlQueue {
    /// Wrap an existing pool, counting the default `jobs` table.
    pub fn from_pool(pool: sqlx::MySqlPool) -> Self {
        Self {
            pool,
            query: count_sql(DEFAULT_TABLE, "?"),
        }
    }

    /// Open a lazy pool for the database at `url`.
    pub fn from_url(url: &str) -> Result<Self, BackendError> {
        let pool = sqlx::MySqlPool::connect_lazy(url)
            .map_err(|e| BackendError::Config(format!("invalid mysql URL: {e}")))?;
        Ok(Self::from_pool(pool))
    }

    /// Count a different table (default `jobs`).
    pub fn with_table(mut self, table: &str) -> Result<Self, BackendError> {
        self.query = count_sql(&checked_table(table)?, "?");
        Ok(self)
    }
}

#[cfg(feature = "mysql")]
#[async_trait]
impl QueueBackend for MySqlQueue {
    fn queue_name(&self) -> &'static str {
        "job-table"
    }

    fn store_name(&self) -> &'static str {
        "MySQL"
    }

    async fn pending(&self) -> Result<u64, BackendError> {
        let eligible: i64 = sqlx::query_scalar(&self.query)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BackendError::Query(format!("mysql count failed: {e}")))?;
        Ok(clamp_count(eligible))
    }
}

/// Store-backed queue counting rows in a SQLite job table.
#[cfg(feature = "sqlite")]
#[derive(Debug, Clone)]
pub struct SqliteQueue {
    pool: sqlx::SqlitePool,
    query: String,
}

#[cfg(feature = "sqlite")]
impl SqliteQueue {
    /// Wrap an existing pool, counting the default `jobs` table.
    pub fn from_pool(pool: sqlx::SqlitePool) -> Self {
        Self {
            pool,
            query: count_sql(DEFAULT_TABLE, "?"),
        }
    }

    /// Open a lazy pool for the database at `url`.
    pub fn from_url(url: &str) -> Result<Self, BackendError> {
        let pool = sqlx::SqlitePool::connect_lazy(url)
            .map_err(|e| BackendError::Config(format!("invalid sqlite URL: {e}")))?;
        Ok(Self::from_pool(pool))
    }

    /// Count a different table (default `jobs`).
    pub fn with_table(mut self, table: &str) -> Result<Self, BackendError> {
        self.query = count_sql(&checked_table(table)?, "?");
        Ok(self)
    }
}

#[cfg(feature = "sqlite")]
#[async_trait]
impl QueueBackend for SqliteQueue {
    fn queue_name(&self) -> &'static str {
        "job-table"
    }

    fn store_name(&self) -> &'static str {
        "SQLite"
    }

    async fn pending(&self) -> Result<u64, BackendError> {
        let eligible: i64 = sqlx::query_scalar(&self.query)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BackendError::Query(format!("sqlite count failed: {e}")))?;
        Ok(clamp_count(eligible))
    }
}
