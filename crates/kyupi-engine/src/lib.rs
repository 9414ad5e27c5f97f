// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Matching engine and chat authorization gate.
//!
//! Both components are stateless between calls: they hold `Arc` handles to
//! the stores and nothing else, so one instance can serve every request.

pub mod chat;
pub mod engine;

pub use chat::ChatGate;
pub use engine::MatchingEngine;
