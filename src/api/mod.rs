//! HTTP API.
//!
//! Exposes the risk scorer, the X-ray classifier and the report composer as
//! JSON and multipart endpoints under `/api/`. Nothing is persisted: every
//! request carries its own patient data and the response is the only output.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod form;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{serve, start_server_on, ApiServer};
pub use types::ApiContext;
