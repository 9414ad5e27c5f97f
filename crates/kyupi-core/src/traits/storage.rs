// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage lifecycle trait.

use async_trait::async_trait;

use crate::error::KyupiError;
use crate::traits::adapter::PluginAdapter;

/// Lifecycle of a persistence backend (connection, migrations, flush).
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), KyupiError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), KyupiError>;
}
