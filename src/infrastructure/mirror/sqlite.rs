#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;

use std::fs;
use std::path;

use anyhow::Result;
use rusqlite::params;
use rusqlite::Connection;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::DeskError;
use crate::domain::models::Direction;
use crate::domain::models::MirrorMessage;

fn direction_to_text(direction: Direction) -> &'static str {
    match direction {
        Direction::Sent => return "sent",
        Direction::Received => return "received",
    }
}

fn direction_from_text(value: &str) -> Direction {
    // The mirror only ever writes the two values below.
    match value {
        "sent" => return Direction::Sent,
        _ => return Direction::Received,
    }
}

/// The locally owned copy of chat messages: one shared `messages` table, no
/// per-contact partitioning. Filtering happens at query time. Each call opens
/// its own connection; there is exactly one writer at a time by construction
/// of the UI.
#[derive(Clone)]
pub struct SqliteMirror {
    path: path::PathBuf,
}

impl Default for SqliteMirror {
    fn default() -> SqliteMirror {
        let path = dirs::data_dir().unwrap().join("blipdesk/mirror.sqlite");

        return SqliteMirror::new(path);
    }
}

impl SqliteMirror {
    pub fn new(path: path::PathBuf) -> SqliteMirror {
        return SqliteMirror { path };
    }

    pub fn from_config() -> SqliteMirror {
        let configured = Config::get(ConfigKey::MirrorFile);
        if configured.is_empty() {
            return SqliteMirror::default();
        }

        return SqliteMirror::new(path::PathBuf::from(configured));
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| return DeskError::Storage(err.to_string()))?;
        }

        let conn = Connection::open(&self.path)
            .map_err(|err| return DeskError::Storage(err.to_string()))?;
        return Ok(conn);
    }

    pub fn init(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                contact_id TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                direction TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_contact_timestamp
                ON messages (contact_id, timestamp);
            "#,
        )
        .map_err(|err| return DeskError::Storage(err.to_string()))?;

        return Ok(());
    }

    /// Validates and inserts one record. No deduplication: appending the
    /// same content twice produces two records.
    pub fn append(&self, message: &MirrorMessage) -> Result<()> {
        message.validate()?;

        let conn = self.open()?;
        conn.execute(
            "INSERT INTO messages (contact_id, message, timestamp, direction) VALUES (?1, ?2, ?3, ?4)",
            params![
                message.contact_id,
                message.message,
                message.timestamp,
                direction_to_text(message.direction)
            ],
        )
        .map_err(|err| return DeskError::Storage(err.to_string()))?;

        return Ok(());
    }

    /// Ascending by timestamp; an empty result set is an empty vec, not an
    /// error.
    pub fn list_by_contact(&self, contact_id: &str) -> Result<Vec<MirrorMessage>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(
                "SELECT contact_id, message, timestamp, direction FROM messages WHERE contact_id = ?1 ORDER BY timestamp ASC",
            )
            .map_err(|err| return DeskError::Storage(err.to_string()))?;

        let rows = stmt
            .query_map(params![contact_id], |row| {
                return Ok(MirrorMessage {
                    contact_id: row.get(0)?,
                    message: row.get(1)?,
                    timestamp: row.get(2)?,
                    direction: direction_from_text(&row.get::<_, String>(3)?),
                });
            })
            .map_err(|err| return DeskError::Storage(err.to_string()))?;

        let mut out = vec![];
        for row in rows {
            out.push(row.map_err(|err| return DeskError::Storage(err.to_string()))?);
        }

        return Ok(out);
    }

    pub fn clear(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM messages", [])
            .map_err(|err| return DeskError::Storage(err.to_string()))?;

        return Ok(());
    }
}
