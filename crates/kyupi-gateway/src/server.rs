// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use kyupi_core::{KyupiError, PluginAdapter};
use kyupi_engine::{ChatGate, MatchingEngine};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, identity_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: MatchingEngine,
    pub chat: ChatGate,
    /// Storage adapter consulted by the health endpoint.
    pub storage: Arc<dyn PluginAdapter>,
    pub auth: AuthConfig,
    pub start_time: Instant,
}

/// Build the full router.
///
/// - `GET /health` (no auth)
/// - `POST /v1/likes`, `POST /v1/passes`
/// - `GET /v1/matches`, `POST /v1/matches/reconcile`
/// - `POST /v1/messages`, `GET /v1/matches/{match_id}/messages`
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/likes", post(handlers::post_like))
        .route("/v1/passes", post(handlers::post_pass))
        .route("/v1/matches", get(handlers::get_matches))
        .route("/v1/matches/reconcile", post(handlers::post_reconcile))
        .route("/v1/matches/{match_id}/messages", get(handlers::get_messages))
        .route("/v1/messages", post(handlers::post_message))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            identity_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `host:port` and serve until `shutdown` is cancelled.
pub async fn start_server(
    host: &str,
    port: u16,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), KyupiError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| KyupiError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| KyupiError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}
