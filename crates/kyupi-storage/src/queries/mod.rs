// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod matches;
pub mod messages;
pub mod preferences;

#[cfg(test)]
pub(crate) mod test_support {
    use kyupi_config::model::StorageConfig;
    use tempfile::TempDir;

    use crate::database::Database;

    pub async fn temp_db() -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        (Database::open(&config).await.unwrap(), dir)
    }
}
