use axum::Router;

pub mod catalog;
pub mod sessions;
pub mod system;

/// Router for every ledger endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/catalog", catalog::router())
        .nest("/sessions", sessions::router())
}
