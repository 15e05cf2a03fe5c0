//! HTTP application wiring (Axum router).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use shopledger_store::StoreManager;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router around an existing store (entrypoint used by `main.rs`).
pub fn build_app(store: Arc<StoreManager>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(store))
        .layer(axum::middleware::from_fn(middleware::trace_requests))
}
