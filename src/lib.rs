//! Embedded job-queue autoscaling probe middleware.
//!
//! Answers `/jobpulse/test` and `/jobpulse/<token>/info` from inside a host
//! application's middleware stack; every other request passes through
//! untouched.

pub mod backend;
pub mod config;
pub mod middleware;
pub mod report;
pub mod routing;

pub use backend::{BackendDescriptor, BackendError, BackendRegistry, QueueBackend};
pub use config::ProbeConfig;
pub use middleware::{attach, intercept, JobPulse};
