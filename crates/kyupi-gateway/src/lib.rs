// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Kyupi matching backend.
//!
//! Exposes the matching engine and chat gate as a JSON REST API. Identity
//! comes from a trusted header set by the upstream authenticator.

pub mod auth;
pub mod handlers;
pub mod server;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::Router;
use tokio_util::sync::CancellationToken;

use kyupi_config::model::GatewayConfig;
use kyupi_core::{AdapterType, HealthStatus, KyupiError, PluginAdapter};
use kyupi_engine::{ChatGate, MatchingEngine};

use crate::auth::AuthConfig;
use crate::server::AppState;

pub use handlers::ApiError;
pub use server::build_router;

/// The HTTP gateway as a pluggable adapter.
///
/// [`run`](Self::run) serves until [`PluginAdapter::shutdown`] is called or
/// the parent token passed to [`new`](Self::new) is cancelled.
pub struct GatewayServer {
    host: String,
    port: u16,
    state: AppState,
    shutdown: CancellationToken,
}

impl GatewayServer {
    pub fn new(
        config: &GatewayConfig,
        engine: MatchingEngine,
        chat: ChatGate,
        storage: Arc<dyn PluginAdapter>,
        parent: &CancellationToken,
    ) -> Result<Self, KyupiError> {
        let auth = AuthConfig::from_config(config)?;
        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            state: AppState {
                engine,
                chat,
                storage,
                auth,
                start_time: Instant::now(),
            },
            shutdown: parent.child_token(),
        })
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind and serve until shutdown.
    pub async fn run(&self) -> Result<(), KyupiError> {
        server::start_server(&self.host, self.port, self.router(), self.shutdown.clone()).await
    }
}

#[async_trait]
impl PluginAdapter for GatewayServer {
    fn name(&self) -> &str {
        "http-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, KyupiError> {
        if self.shutdown.is_cancelled() {
            Ok(HealthStatus::Unhealthy("gateway shut down".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), KyupiError> {
        self.shutdown.cancel();
        Ok(())
    }
}
