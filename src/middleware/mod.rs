//! Request interception.
//!
//! # Data Flow
//! ```text
//! host request
//!     → intercept (classify URI path)
//!         SelfTest    → registry.descriptor() → self-test report
//!         Info        → registry.job_count().await → JSON body
//!         PassThrough → next.run(request) (untouched)
//! ```
//!
//! # Design Decisions
//! - One probe state (`JobPulse`) shared by value: config plus registry
//!   behind one `Arc`
//! - Probe endpoints are answered here and never reach the host's routes
//! - Pass-through requests are forwarded without reading the body or
//!   altering headers

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::Router;

use crate::backend::BackendRegistry;
use crate::config::ProbeConfig;
use crate::report;
use crate::routing::{classify, Endpoint};

/// Shared probe state: configuration plus the backend registry.
///
/// Cheap to clone; all clones observe the same registry.
#[derive(Debug, Clone)]
pub struct JobPulse {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: ProbeConfig,
    registry: BackendRegistry,
}

impl JobPulse {
    pub fn new(config: ProbeConfig, registry: BackendRegistry) -> Self {
        Self {
            inner: Arc::new(Inner { config, registry }),
        }
    }

    /// Probe wired entirely from the environment: token from
    /// `JOBPULSE_TOKEN`, backends from `REDIS_URL` / `DATABASE_URL`.
    pub fn from_env() -> Self {
        Self::new(ProbeConfig::from_env(), BackendRegistry::from_env())
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.inner.registry
    }
}

/// Middleware entry point: answer probe endpoints, forward the rest.
///
/// Apply with `axum::middleware::from_fn_with_state(probe, intercept)` or
/// via [`attach`].
pub async fn intercept(
    State(probe): State<JobPulse>,
    request: Request,
    next: Next,
) -> Response {
    match classify(request.uri().path(), probe.config().token()) {
        Endpoint::SelfTest => {
            let descriptor = probe.registry().descriptor();
            tracing::debug!(
                queue = descriptor.queue,
                store = descriptor.store,
                "Answering self-test probe"
            );
            report::self_test_response(&descriptor)
        }
        Endpoint::Info => {
            let count = probe.registry().job_count().await;
            tracing::debug!(job_count = ?count, "Answering job count probe");
            report::info_response(count)
        }
        Endpoint::PassThrough => next.run(request).await,
    }
}

/// Wire the probe in front of a finished router.
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use jobpulse::JobPulse;
///
/// let app: Router = Router::new().route("/", get(|| async { "home" }));
/// let app = jobpulse::attach(app, JobPulse::from_env());
/// ```
pub fn attach(router: Router, probe: JobPulse) -> Router {
    router.layer(axum::middleware::from_fn_with_state(probe, intercept))
}
