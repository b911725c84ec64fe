//! Response rendering.
//!
//! # Responsibilities
//! - Render the human-readable self-test report
//! - Render the machine-readable job-count body
//!
//! # Design Decisions
//! - Rendering never fails: unknown values appear as placeholders
//! - The self-test body leads with the crate name so probes can recognize
//!   a live installation with a substring check
//! - Info body is exactly `{"job_count":N}` or `{"job_count":null}`

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::backend::BackendDescriptor;

/// Marker substring probes look for in the self-test body.
pub const MARKER: &str = "jobpulse";

/// Self-test report line.
pub fn self_test_body(descriptor: &BackendDescriptor) -> String {
    let status = if descriptor.complete() {
        "OK"
    } else {
        "INCOMPLETE"
    };
    format!(
        "[{MARKER}: {status}] queue: {} - store: {}",
        descriptor.queue, descriptor.store
    )
}

/// 200 `text/plain` self-test response.
pub fn self_test_response(descriptor: &BackendDescriptor) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        self_test_body(descriptor),
    )
        .into_response()
}

/// Info payload; `None` renders as JSON null.
pub fn info_payload(count: Option<u64>) -> Value {
    json!({ "job_count": count })
}

/// 200 `application/json` info response.
pub fn info_response(count: Option<u64>) -> Response {
    Json(info_payload(count)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_test_reports_detected_backend() {
        let descriptor = BackendDescriptor {
            queue: "redis-queue",
            store: "Redis",
        };
        assert_eq!(
            self_test_body(&descriptor),
            "[jobpulse: OK] queue: redis-queue - store: Redis"
        );
    }

    #[test]
    fn test_self_test_degrades_when_nothing_detected() {
        assert_eq!(
            self_test_body(&BackendDescriptor::ABSENT),
            "[jobpulse: INCOMPLETE] queue: not found - store: not found"
        );
    }

    #[test]
    fn test_info_payload_renders_exact_json() {
        assert_eq!(info_payload(Some(5)).to_string(), r#"{"job_count":5}"#);
        assert_eq!(info_payload(Some(0)).to_string(), r#"{"job_count":0}"#);
        assert_eq!(info_payload(None).to_string(), r#"{"job_count":null}"#);
    }

    #[test]
    fn test_responses_carry_content_types() {
        let response = self_test_response(&BackendDescriptor::ABSENT);
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        let response = info_response(None);
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
