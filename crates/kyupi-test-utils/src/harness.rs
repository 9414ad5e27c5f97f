// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-directory SQLite harness for integration tests.

use std::sync::Arc;

use kyupi_config::model::{KyupiConfig, StorageConfig};
use kyupi_core::KyupiError;
use kyupi_storage::SqliteStorage;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    config: KyupiConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: KyupiConfig::default(),
        }
    }

    /// Cap chat message length.
    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.config.chat.max_message_length = max;
        self
    }

    /// Require this bearer token at the gateway.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.gateway.bearer_token = Some(token.into());
        self
    }

    /// Create the temp directory, open the database, and run migrations.
    pub async fn build(self) -> Result<TestHarness, KyupiError> {
        let temp_dir = tempfile::TempDir::new().map_err(KyupiError::storage)?;
        let database_path = temp_dir
            .path()
            .join("kyupi-test.db")
            .to_string_lossy()
            .into_owned();

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path,
            ..config.storage
        };

        let storage = Arc::new(SqliteStorage::open(config.storage.clone()).await?);

        Ok(TestHarness {
            storage,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// Initialized SQLite storage backed by a temp file, removed on drop.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    /// Config whose `storage.database_path` points at the temp database.
    pub config: KyupiConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings.
    pub async fn new() -> Result<Self, KyupiError> {
        Self::builder().build().await
    }
}
