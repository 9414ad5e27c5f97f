// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied
//! when the database is opened.

use kyupi_core::KyupiError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery records applied versions in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), KyupiError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(KyupiError::storage)?;
    for applied in report.applied_migrations() {
        tracing::debug!(version = applied.version(), name = applied.name(), "applied migration");
    }
    Ok(())
}
