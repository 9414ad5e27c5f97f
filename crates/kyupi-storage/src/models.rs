// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between SQLite rows and the core entity types.
//!
//! Identities are stored as lowercase hyphenated UUID text, decisions as
//! their lowercase names.

use std::str::FromStr;

use rusqlite::Row;
use rusqlite::types::Type;

pub use kyupi_core::types::{Match, Message, Preference};

/// Column list for `preferences`, in the order [`preference_from_row`] expects.
pub const PREFERENCE_COLUMNS: &str = "id, actor_id, target_id, decision, created_at, updated_at";

/// Column list for `matches`, in the order [`match_from_row`] expects.
pub const MATCH_COLUMNS: &str = "id, user_low, user_high, created_at, updated_at";

/// Column list for `messages`, in the order [`message_from_row`] expects.
pub const MESSAGE_COLUMNS: &str = "id, match_id, sender_id, receiver_id, content, created_at";

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn preference_from_row(row: &Row<'_>) -> rusqlite::Result<Preference> {
    Ok(Preference {
        id: parse_column(row, 0)?,
        actor_id: parse_column(row, 1)?,
        target_id: parse_column(row, 2)?,
        decision: parse_column(row, 3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn match_from_row(row: &Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: parse_column(row, 0)?,
        user_low: parse_column(row, 1)?,
        user_high: parse_column(row, 2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

pub fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: parse_column(row, 0)?,
        match_id: parse_column(row, 1)?,
        sender_id: parse_column(row, 2)?,
        receiver_id: parse_column(row, 3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
    })
}
