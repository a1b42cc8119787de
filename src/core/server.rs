use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use crate::core::controller::{AppState, build_router};
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::{RepositoryStore, StorageBackend};
use crate::utils::logs::setup_tracing;

// Loads configuration from the environment (and .env when present), opens the
// configured storage, then serves the lending API until Ctrl-C.
pub async fn run() -> LibraryResult<()> {
    let _ = dotenvy::dotenv();
    let config = Configuration::from_env()?;
    setup_tracing(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let backend = StorageBackend::from_config(&config).await?;
    info!(backend = backend.name(), "storage ready");
    let state = AppState::new(config.clone(), RepositoryStore::new(&backend));
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(branch = config.branch_id.as_str(), %addr, "lending ledger listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    if let StorageBackend::Postgres(pool) = &backend {
        pool.close().await;
    }
    info!("lending ledger stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal {}", err);
        std::future::pending::<()>().await;
    }
}
