// ABOUTME: HTTP server assembly: shared resources, router composition and the serve loop
// ABOUTME: API routes sit behind the club context middleware; /health does not
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::middleware::club_context_middleware;
use crate::routes::{CancellationRoutes, HealthRoutes, PlanRoutes, RegisterRoutes, SessionRoutes};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Resources shared by every request handler
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// Server configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundle the database and configuration
    #[must_use]
    pub const fn new(database: Database, config: ServerConfig) -> Self {
        Self { database, config }
    }
}

/// Build the application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    let api = Router::new()
        .merge(CancellationRoutes::routes(resources.clone()))
        .merge(SessionRoutes::routes(resources.clone()))
        .merge(RegisterRoutes::routes(resources.clone()))
        .merge(PlanRoutes::routes(resources.clone()))
        .layer(middleware::from_fn_with_state(
            resources.clone(),
            club_context_middleware,
        ));

    Router::new()
        .merge(HealthRoutes::routes(resources))
        .merge(api)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until Ctrl-C
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("HTTP server error: {e}")))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
}
