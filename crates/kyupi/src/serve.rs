// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `kyupi serve`: wire storage, engine, chat gate and gateway, then serve
//! until a shutdown signal arrives.

use std::path::Path;
use std::sync::Arc;

use kyupi_config::KyupiConfig;
use kyupi_core::{KyupiError, PluginAdapter, StorageAdapter};
use kyupi_engine::{ChatGate, MatchingEngine};
use kyupi_gateway::GatewayServer;
use kyupi_storage::SqliteStorage;
use tracing::{error, info};

use crate::shutdown;

pub async fn run_serve(config: KyupiConfig) -> Result<(), KyupiError> {
    init_tracing(&config.service.log_level);
    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        "starting"
    );

    if let Some(parent) = Path::new(&config.storage.database_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(KyupiError::storage)?;
    }

    let storage = Arc::new(SqliteStorage::open(config.storage.clone()).await?);
    let engine = MatchingEngine::new(storage.clone(), storage.clone());
    let chat = ChatGate::new(storage.clone(), storage.clone(), &config.chat);

    let cancel = shutdown::install_signal_handler();
    let gateway = GatewayServer::new(&config.gateway, engine, chat, storage.clone(), &cancel)?;

    let served = gateway.run().await;
    if let Err(e) = &served {
        error!(error = %e, "gateway failed");
    }

    gateway.shutdown().await?;
    storage.close().await?;
    info!("shutdown complete");
    served
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kyupi={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
