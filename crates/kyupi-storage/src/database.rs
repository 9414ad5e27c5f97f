// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::time::Duration;

use kyupi_config::model::StorageConfig;
use kyupi_core::KyupiError;
use tracing::{debug, info};

/// Convert a tokio-rusqlite error into `KyupiError::StorageUnavailable`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> KyupiError {
    KyupiError::storage(e)
}

/// Whether a rusqlite error is a UNIQUE constraint violation.
///
/// Inserts rely on this as the "row already exists" signal instead of
/// checking beforehand.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Handle to the single SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    op_timeout: Duration,
}

impl Database {
    /// Open (or create) the database, apply PRAGMAs, and run pending migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, KyupiError> {
        let conn = tokio_rusqlite::Connection::open(&config.database_path)
            .await
            .map_err(KyupiError::storage)?;

        let wal_mode = config.wal_mode;
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA synchronous = NORMAL;")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| -> Result<(), KyupiError> { crate::migrations::run_migrations(conn) })
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                other => KyupiError::storage(other.to_string()),
            })?;

        info!(path = %config.database_path, wal_mode, "database opened");

        Ok(Self {
            conn,
            op_timeout: Duration::from_millis(config.op_timeout_ms),
        })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Run `f` on the connection thread, bounded by the configured operation timeout.
    ///
    /// Both rusqlite failures and timeout expiry surface as
    /// `KyupiError::StorageUnavailable`.
    pub async fn call<F, R>(&self, f: F) -> Result<R, KyupiError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, rusqlite::Error> + Send + 'static,
        R: Send + 'static,
    {
        match tokio::time::timeout(self.op_timeout, self.conn.call(f)).await {
            Ok(result) => result.map_err(map_tr_err),
            Err(_) => Err(KyupiError::storage(format!(
                "storage operation exceeded {}ms",
                self.op_timeout.as_millis()
            ))),
        }
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), KyupiError> {
        self.call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
