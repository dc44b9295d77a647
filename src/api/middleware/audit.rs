//! Request logging middleware.
//!
//! Logs method, path, response status and latency for every request, tagged
//! with a per-request id.
//! Query strings and bodies are never logged: they may carry patient data.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub async fn log_access(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::warn!(%request_id, %method, %path, status, latency_ms, "request failed");
    } else {
        tracing::info!(%request_id, %method, %path, status, latency_ms, "request");
    }

    response
}
