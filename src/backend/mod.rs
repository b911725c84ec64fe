//! Backend detection and count aggregation.
//!
//! # Responsibilities
//! - Hold the ordered adapter registry (registration order = priority)
//! - Resolve the active backend: first adapter whose `detect()` is true
//! - Aggregate the pending-job count, converting every failure to "unknown"
//!
//! # Design Decisions
//! - Explicit registry instead of ambient probing: a new backend is a new
//!   adapter registration, not an edit to detection logic
//! - `detect()` is cheap and performs no I/O; reachability problems surface
//!   later as failed count queries
//! - Adapter errors stop at this boundary: logged at warn, surfaced as None
//! - Descriptor and count are recomputed per call, never cached
//!
//! # Data Flow
//! ```text
//! BackendRegistry (ordered Vec<Arc<dyn QueueBackend>>)
//!     → descriptor():  first detected adapter → queue/store names
//!     → job_count():   first detected adapter → pending().await
//!                        Ok(n)  → Some(n)
//!                        Err(e) → warn! → None
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
#[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))]
pub mod sql;

pub use memory::{InMemoryQueue, JobRecord};
#[cfg(feature = "redis")]
pub use self::redis::RedisQueue;
#[cfg(feature = "mysql")]
pub use self::sql::MySqlQueue;
#[cfg(feature = "postgres")]
pub use self::sql::PostgresQueue;
#[cfg(feature = "sqlite")]
pub use self::sql::SqliteQueue;

/// Sentinel name reported when no backend was detected.
pub const NOT_FOUND: &str = "not found";

/// Failure inside a backend adapter.
///
/// These never cross the aggregation boundary: `BackendRegistry::job_count`
/// logs them and answers "unknown".
#[derive(Debug, Error)]
pub enum BackendError {
    /// The adapter was built from unusable configuration.
    #[error("invalid backend configuration: {0}")]
    Config(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the count query.
    #[error("count query failed: {0}")]
    Query(String),
}

/// A job-queue backend adapter.
///
/// Adapters pair a queue library name with the store it persists to and
/// answer one question: how many jobs are runnable right now.
#[async_trait]
pub trait QueueBackend: Send + Sync + fmt::Debug {
    /// Short name of the queue implementation, e.g. `redis-queue`.
    fn queue_name(&self) -> &'static str;

    /// Display name of the backing store, e.g. `Redis`.
    fn store_name(&self) -> &'static str;

    /// Whether this backend is present in the current process.
    ///
    /// Must be cheap and must not perform I/O. Registration normally implies
    /// presence, so most adapters answer `true` unconditionally.
    fn detect(&self) -> bool {
        true
    }

    /// Count jobs that are eligible to run at this instant.
    async fn pending(&self) -> Result<u64, BackendError>;
}

/// Names of the detected queue/store combination.
///
/// Recomputed on every request from the current registry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub queue: &'static str,
    pub store: &'static str,
}

impl BackendDescriptor {
    /// Descriptor reported when no adapter detected.
    pub const ABSENT: Self = Self {
        queue: NOT_FOUND,
        store: NOT_FOUND,
    };

    /// True when both axes resolved to a real backend.
    pub fn complete(&self) -> bool {
        self.queue != NOT_FOUND && self.store != NOT_FOUND
    }
}

impl Default for BackendDescriptor {
    fn default() -> Self {
        Self::ABSENT
    }
}

/// Ordered collection of backend adapters.
///
/// The first adapter whose `detect()` returns true answers both the
/// descriptor and the count; the rest are never consulted.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn QueueBackend>>,
}

impl BackendRegistry {
    /// Empty registry. Nothing detects; counts are unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the process environment.
    ///
    /// Registers exactly the adapters whose configuration is present, in
    /// canonical priority order: the Redis broker first, then the SQL store
    /// selected by the `DATABASE_URL` scheme.
    pub fn from_env() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "redis")]
        if let Some(backend) = self::redis::RedisQueue::from_env() {
            registry.register(Arc::new(backend));
        }
        #[cfg(any(feature = "postgres", feature = "mysql", feature = "sqlite"))]
        if let Some(backend) = self::sql::from_env() {
            registry.register(backend);
        }
        registry
    }

    /// Append an adapter. Registration order is priority order.
    pub fn register(&mut self, backend: Arc<dyn QueueBackend>) {
        tracing::debug!(
            queue = backend.queue_name(),
            store = backend.store_name(),
            "Registered queue backend"
        );
        self.backends.push(backend);
    }

    /// Chaining variant of [`register`](Self::register).
    pub fn with(mut self, backend: impl QueueBackend + 'static) -> Self {
        self.register(Arc::new(backend));
        self
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// First registered adapter that detects as present.
    fn active(&self) -> Option<&Arc<dyn QueueBackend>> {
        self.backends.iter().find(|b| b.detect())
    }

    /// Names of the active backend, or the absent sentinel pair.
    pub fn descriptor(&self) -> BackendDescriptor {
        match self.active() {
            Some(backend) => BackendDescriptor {
                queue: backend.queue_name(),
                store: backend.store_name(),
            },
            None => BackendDescriptor::ABSENT,
        }
    }

    /// Pending-job count of the active backend.
    ///
    /// `None` means the count could not be determined: no adapter detected,
    /// or the active adapter's query failed. Failures are logged here and go
    /// no further.
    pub async fn job_count(&self) -> Option<u64> {
        let backend = self.active()?;
        match backend.pending().await {
            Ok(count) => Some(count),
            Err(error) => {
                tracing::warn!(
                    queue = backend.queue_name(),
                    store = backend.store_name(),
                    error = %error,
                    "Job count query failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct StubBackend {
        queue: &'static str,
        store: &'static str,
        present: bool,
        count: Option<u64>,
    }

    #[async_trait]
    impl QueueBackend for StubBackend {
        fn queue_name(&self) -> &'static str {
            self.queue
        }

        fn store_name(&self) -> &'static str {
            self.store
        }

        fn detect(&self) -> bool {
            self.present
        }

        async fn pending(&self) -> Result<u64, BackendError> {
            self.count
                .ok_or_else(|| BackendError::Unavailable("stub offline".into()))
        }
    }

    #[tokio::test]
    async fn test_empty_registry_reports_absent() {
        let registry = BackendRegistry::new();

        let descriptor = registry.descriptor();
        assert_eq!(descriptor, BackendDescriptor::ABSENT);
        assert!(!descriptor.complete());
        assert_eq!(registry.job_count().await, None);
    }

    #[tokio::test]
    async fn test_first_detected_backend_wins() {
        let registry = BackendRegistry::new()
            .with(StubBackend {
                queue: "first",
                store: "First",
                present: false,
                count: Some(99),
            })
            .with(StubBackend {
                queue: "second",
                store: "Second",
                present: true,
                count: Some(7),
            })
            .with(StubBackend {
                queue: "third",
                store: "Third",
                present: true,
                count: Some(42),
            });

        let descriptor = registry.descriptor();
        assert_eq!(descriptor.queue, "second");
        assert_eq!(descriptor.store, "Second");
        assert!(descriptor.complete());
        assert_eq!(registry.job_count().await, Some(7));
    }

    #[tokio::test]
    async fn test_query_failure_becomes_unknown() {
        let registry = BackendRegistry::new().with(StubBackend {
            queue: "broken",
            store: "Broken",
            present: true,
            count: None,
        });

        // Detection succeeded, so the names are real even though the
        // count is unknowable.
        assert!(registry.descriptor().complete());
        assert_eq!(registry.job_count().await, None);
    }

    #[tokio::test]
    async fn test_count_is_stable_across_calls() {
        let registry = BackendRegistry::new().with(StubBackend {
            queue: "stable",
            store: "Stable",
            present: true,
            count: Some(3),
        });

        assert_eq!(registry.job_count().await, Some(3));
        assert_eq!(registry.job_count().await, Some(3));
    }
}
