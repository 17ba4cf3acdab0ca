//! Per-profile ledger snapshots and accrual bookkeeping.

use super::PetStore;
use crate::{error::PetResult, types::EpochMs};
use rusqlite::{params, OptionalExtension};

impl PetStore {
    // ── Ledger snapshot ──────────────────────────────────────────

    pub fn save_profile_state(&self, profile_id: &str, state_json: &str, at: EpochMs) -> PetResult<()> {
        self.conn.execute(
            "INSERT INTO profile_state (profile_id, state_json, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(profile_id) DO UPDATE SET
                 state_json = excluded.state_json,
                 updated_at = excluded.updated_at",
            params![profile_id, state_json, at],
        )?;
        Ok(())
    }

    pub fn load_profile_state(&self, profile_id: &str) -> PetResult<Option<String>> {
        let json = self
            .conn
            .query_row(
                "SELECT state_json FROM profile_state WHERE profile_id = ?1",
                params![profile_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(json)
    }

    // ── Mood accrual ─────────────────────────────────────────────

    pub fn last_mood_check(&self, profile_id: &str) -> PetResult<Option<EpochMs>> {
        let last = self
            .conn
            .query_row(
                "SELECT last_check_ms FROM mood_check WHERE profile_id = ?1",
                params![profile_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(last)
    }

    pub fn set_last_mood_check(&self, profile_id: &str, at: EpochMs) -> PetResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO mood_check (profile_id, last_check_ms) VALUES (?1, ?2)",
            params![profile_id, at],
        )?;
        Ok(())
    }
}
