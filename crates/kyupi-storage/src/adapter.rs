// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage and store traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use kyupi_config::model::StorageConfig;
use kyupi_core::types::{Match, MatchId, Message, Preference, UserId};
use kyupi_core::{
    AdapterType, CanonicalPair, HealthStatus, KyupiError, MatchStore, MessageStore,
    PluginAdapter, PreferenceStore, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened on the first call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage; nothing is opened until [`StorageAdapter::initialize`].
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, KyupiError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    fn db(&self) -> Result<&Database, KyupiError> {
        self.db
            .get()
            .ok_or_else(|| KyupiError::storage("storage not initialized -- call initialize() first"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, KyupiError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".to_string()));
        };
        match db.call(|conn| conn.execute_batch("SELECT 1;")).await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), KyupiError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), KyupiError> {
        let db = Database::open(&self.config).await?;
        self.db
            .set(db)
            .map_err(|_| KyupiError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), KyupiError> {
        self.db()?.checkpoint().await
    }
}

#[async_trait]
impl PreferenceStore for SqliteStorage {
    async fn insert_preference(&self, preference: &Preference) -> Result<(), KyupiError> {
        queries::preferences::insert_preference(self.db()?, preference).await
    }

    async fn get_preference(
        &self,
        actor: &UserId,
        target: &UserId,
    ) -> Result<Option<Preference>, KyupiError> {
        queries::preferences::get_preference(self.db()?, actor, target).await
    }

    async fn has_liked(&self, actor: &UserId, target: &UserId) -> Result<bool, KyupiError> {
        queries::preferences::has_liked(self.db()?, actor, target).await
    }
}

#[async_trait]
impl MatchStore for SqliteStorage {
    async fn exists(&self, a: &UserId, b: &UserId) -> Result<bool, KyupiError> {
        let pair = CanonicalPair::new(*a, *b)?;
        queries::matches::exists(self.db()?, &pair).await
    }

    async fn create_if_absent(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<(Match, bool), KyupiError> {
        let pair = CanonicalPair::new(*a, *b)?;
        let (record, created) = queries::matches::create_if_absent(self.db()?, &pair).await?;
        debug!(match_id = %record.id, created, "match create_if_absent");
        Ok((record, created))
    }

    async fn list_for_identity(&self, user: &UserId) -> Result<Vec<Match>, KyupiError> {
        queries::matches::list_for_identity(self.db()?, user).await
    }

    async fn get_match(&self, id: &MatchId) -> Result<Option<Match>, KyupiError> {
        queries::matches::get_by_id(self.db()?, id).await
    }

    async fn get_match_for_pair(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Match>, KyupiError> {
        let pair = CanonicalPair::new(*a, *b)?;
        queries::matches::get_for_pair(self.db()?, &pair).await
    }
}

#[async_trait]
impl MessageStore for SqliteStorage {
    async fn append_message(&self, message: &Message) -> Result<(), KyupiError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn list_messages(&self, match_id: &MatchId) -> Result<Vec<Message>, KyupiError> {
        queries::messages::list_for_match(self.db()?, match_id).await
    }
}
