// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter and store trait definitions.
//!
//! All traits use `#[async_trait]` so implementations can sit behind
//! `Arc<dyn ...>` handles in the engine and gateway.

pub mod adapter;
pub mod matches;
pub mod messages;
pub mod preferences;
pub mod storage;

pub use adapter::PluginAdapter;
pub use matches::MatchStore;
pub use messages::MessageStore;
pub use preferences::PreferenceStore;
pub use storage::StorageAdapter;
