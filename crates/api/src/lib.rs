//! HTTP adapter over the stock ledger.
//!
//! Every handler translates one request into one ledger call; no business
//! rule lives here.

pub mod app;
pub mod config;
pub mod middleware;

pub use config::ApiConfig;
