//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! Engine components call store methods and never execute SQL directly.

use crate::{error::PetResult, event::EventLogEntry};
mod profile;
mod settings;
mod task;
use rusqlite::{params, Connection};

pub struct PetStore {
    conn: Connection,
}

impl PetStore {
    pub fn open(path: &str) -> PetResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        log::debug!("store: opened {path}");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PetResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PetResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> PetResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (profile_id, at_ms, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.profile_id, entry.at_ms, entry.event_type, entry.payload],
        )?;
        Ok(())
    }

    pub fn events_for_profile(&self, profile_id: &str) -> PetResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_id, at_ms, event_type, payload
             FROM event_log WHERE profile_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![profile_id], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    profile_id: row.get(1)?,
                    at_ms: row.get(2)?,
                    event_type: row.get(3)?,
                    payload: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, profile_id: &str, event_type: &str) -> PetResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE profile_id = ?1 AND event_type = ?2",
            params![profile_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
