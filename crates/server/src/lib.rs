//! REST server for the bizsearch business search gateway
//!
//! This crate exposes the search and review lookup routes over HTTP, backed
//! by a single shared document engine client.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod api;
mod rest_server;

pub use api::SearchGateway;
pub use rest_server::{build_router, ApiError, AppState};

// Re-export error types from core
pub use bizsearch_core::error::{Error, Result};

use bizsearch_core::config::Config;
use bizsearch_storage::create_document_engine;
use tracing::{info, warn};

/// Run the REST server with the given configuration.
///
/// This:
/// 1. Creates the document engine client from `config.engine`
/// 2. Checks the engine is reachable (a failure is logged, not fatal)
/// 3. Serves the REST API on `server.host:server.port`
/// 4. Shuts down gracefully on Ctrl+C
///
/// # Returns
///
/// Returns `Ok(())` on clean shutdown, or an error if startup fails.
pub async fn run_server(config: Config) -> Result<()> {
    let engine = create_document_engine(&config.engine)?;

    if let Err(e) = engine.health_check().await {
        warn!("Search engine not reachable at startup: {e}");
    }

    let app = build_router(AppState::new(engine), &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    info!("REST API listening on http://{addr} (docs at /swagger-ui)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
        Err(e) => tracing::error!("Error setting up signal handler: {e}"),
    }
}
