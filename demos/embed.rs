use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobpulse::backend::{BackendRegistry, InMemoryQueue, JobRecord};
use jobpulse::{JobPulse, ProbeConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobpulse=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A host application that queues work on the process heap.
    let queue = Arc::new(InMemoryQueue::new());
    queue.push(JobRecord::ready_now());
    queue.push(JobRecord::ready_now());
    queue.push(JobRecord::scheduled_at(Utc::now() + Duration::hours(1)));

    let mut registry = BackendRegistry::new();
    registry.register(queue.clone());

    let probe = JobPulse::new(ProbeConfig::new("local-dev-token"), registry);

    let app = Router::new().route("/", get(|| async { "host application" }));
    let app = jobpulse::attach(app, probe);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Demo host listening");
    println!("self-test:  http://{addr}/jobpulse/test");
    println!("job count:  http://{addr}/jobpulse/local-dev-token/info");

    axum::serve(listener, app).await?;
    Ok(())
}
