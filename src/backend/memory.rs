//! In-process job store.
//!
//! # Responsibilities
//! - Back embedded hosts that queue work on the process heap
//! - Provide a deterministic store for tests and demos
//!
//! # Design Decisions
//! - Plain `Mutex<Vec<_>>`: counts are O(n) over a small list, no index
//! - Same eligibility rule as the SQL stores: not failed, `run_at <= now`

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{BackendError, QueueBackend};

/// One queued job: when it may run and whether it already failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRecord {
    pub run_at: DateTime<Utc>,
    pub failed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// A job eligible to run immediately.
    pub fn ready_now() -> Self {
        Self {
            run_at: Utc::now(),
            failed_at: None,
        }
    }

    /// A job scheduled for a specific time.
    pub fn scheduled_at(run_at: DateTime<Utc>) -> Self {
        Self {
            run_at,
            failed_at: None,
        }
    }

    /// A job that already failed and must never be counted.
    pub fn failed(at: DateTime<Utc>) -> Self {
        Self {
            run_at: at,
            failed_at: Some(at),
        }
    }

    fn eligible(&self, now: DateTime<Utc>) -> bool {
        self.failed_at.is_none() && self.run_at <= now
    }
}

/// Job store living on the process heap.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    jobs: Mutex<Vec<JobRecord>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a job.
    pub fn push(&self, job: JobRecord) {
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.push(job);
        }
    }

    /// Drop every queued job.
    pub fn clear(&self) {
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.clear();
        }
    }
}

#[async_trait]
impl QueueBackend for InMemoryQueue {
    fn queue_name(&self) -> &'static str {
        "in-memory"
    }

    fn store_name(&self) -> &'static str {
        "process heap"
    }

    async fn pending(&self) -> Result<u64, BackendError> {
        let jobs = self
            .jobs
            .lock()
            .map_err(|_| BackendError::Unavailable("job list lock poisoned".into()))?;
        let now = Utc::now();
        Ok(jobs.iter().filter(|job| job.eligible(now)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_run_at_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(JobRecord::scheduled_at(now).eligible(now));
        assert!(!JobRecord::scheduled_at(now + Duration::seconds(1)).eligible(now));
    }

    #[tokio::test]
    async fn test_counts_only_runnable_jobs() {
        let queue = InMemoryQueue::new();
        let now = Utc::now();

        queue.push(JobRecord::ready_now());
        queue.push(JobRecord::scheduled_at(now - Duration::minutes(5)));
        queue.push(JobRecord::scheduled_at(now + Duration::hours(1)));
        queue.push(JobRecord::failed(now - Duration::minutes(1)));
        queue.push(JobRecord::failed(now - Duration::hours(2)));

        assert_eq!(queue.pending().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_queue_counts_zero() {
        let queue = InMemoryQueue::new();
        assert_eq!(queue.pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_resets_count() {
        let queue = InMemoryQueue::new();
        queue.push(JobRecord::ready_now());
        queue.push(JobRecord::ready_now());
        queue.clear();
        assert_eq!(queue.pending().await.unwrap(), 0);
    }
}
