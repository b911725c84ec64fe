//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::{routing::get, Router};

use jobpulse::JobPulse;

/// Host application with a couple of plain routes, fronted by the probe.
pub fn host_app(probe: JobPulse) -> Router {
    let app = Router::new()
        .route("/", get(|| async { "host home" }))
        .route("/widgets", get(|| async { "widget list" }));
    jobpulse::attach(app, probe)
}

/// Serve `app` on an ephemeral port and return the bound address.
pub async fn spawn_host(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Client that never reuses pooled connections between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
