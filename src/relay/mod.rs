//! HTTP relay - forwards merged PDFs from the merge service to end users.
//!
//! This module provides the relay server, including routing, request
//! handling, and graceful shutdown.

pub mod handlers;
pub mod state;


use crate::client::MergeClient;
use crate::config::RelayConfig;
use crate::error::{DocMergeError, Result};
use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Creates the relay router with all endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/merge", post(handlers::merge))
        .route("/report/:id", get(handlers::report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the relay server and runs until interrupted.
pub async fn serve(config: &RelayConfig, client: MergeClient) -> Result<()> {
    let addr = SocketAddr::new(
        config
            .bind
            .parse::<IpAddr>()
            .map_err(|e| DocMergeError::config_with_source("Invalid bind address", e))?,
        config.port,
    );

    info!(
        addr = %addr,
        upstream = %client.base_url(),
        "Starting relay server"
    );

    let state = Arc::new(AppState::new(client));
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay server shut down cleanly");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
