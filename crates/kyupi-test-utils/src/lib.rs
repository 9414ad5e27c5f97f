// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Kyupi integration tests.
//!
//! - [`MemoryStore`] - in-memory implementation of every store trait, with
//!   per-operation fault injection and call counting
//! - [`TestHarness`] - initialized SQLite storage in a temp directory plus a
//!   matching config

pub mod harness;
pub mod memory_store;

pub use harness::TestHarness;
pub use memory_store::{MemoryStore, StoreOp};
