//! API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//!
//! Layer stack (outermost → innermost):
//! 1. `Cache-Control: no-store` on every response
//! 2. Request logging
//! 3. Body size limit (upload cap plus multipart overhead)

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Room for the text parts and multipart framing around the image.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Build the API router over shared core state.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let body_limit = core
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD);
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/risk", post(endpoints::risk::assess))
        .route("/xray", post(endpoints::xray::classify))
        .route("/report/pdf", post(endpoints::report::pdf))
        .route("/report/text", post(endpoints::report::text))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
