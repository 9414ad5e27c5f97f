// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message operations.

use kyupi_core::KyupiError;
use kyupi_core::types::MatchId;
use rusqlite::params;

use crate::database::Database;
use crate::models::{MESSAGE_COLUMNS, Message, message_from_row};

/// Append a message. The referenced match must exist.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<(), KyupiError> {
    let msg = msg.clone();
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO messages (id, match_id, sender_id, receiver_id, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                msg.id.to_string(),
                msg.match_id.to_string(),
                msg.sender_id.to_string(),
                msg.receiver_id.to_string(),
                msg.content,
                msg.created_at,
            ],
        )?;
        Ok(())
    })
    .await
}

/// Messages for a match in chronological order (insertion order breaks ties).
pub async fn list_for_match(db: &Database, match_id: &MatchId) -> Result<Vec<Message>, KyupiError> {
    let match_id = match_id.to_string();
    db.call(move |conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE match_id = ?1
             ORDER BY created_at ASC, rowid ASC"
        ))?;
        let rows = stmt.query_map(params![match_id], message_from_row)?;
        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    })
    .await
}
