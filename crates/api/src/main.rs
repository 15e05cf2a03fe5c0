use std::sync::Arc;

use anyhow::Context;

use shopledger_api::{ApiConfig, app};
use shopledger_inventory::Inventory;
use shopledger_store::StoreManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    shopledger_observability::init_with(config.log_format);

    let store = if config.seed_catalog {
        Arc::new(StoreManager::init())
    } else {
        tracing::warn!("catalog seeding disabled; starting with an empty inventory");
        Arc::new(StoreManager::new(Arc::new(Inventory::new())))
    };

    let router = app::build_app(store.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    match Arc::try_unwrap(store) {
        Ok(store) => {
            store.teardown();
        }
        Err(_) => tracing::warn!("store still shared at shutdown; skipping teardown"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
