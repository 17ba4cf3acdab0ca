//! Engine event log: an audit trail of every ledger and task change.
//!
//! Variants are appended over time, never removed or reordered.

use crate::{
    catalog::Rarity,
    types::{EpochMs, ProfileId, TaskId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PetEvent {
    // ── Session ────────────────────────────────────
    ProfileLoaded {
        profile_id:     ProfileId,
        starter_seeded: bool,
    },

    // ── Currency ───────────────────────────────────
    GemsCredited {
        amount: u64,
        reason: String,
    },
    GemsDebited {
        amount: u64,
        reason: String,
    },

    // ── Draws ──────────────────────────────────────
    ItemDrawn {
        item_id:      String,
        rarity:       Rarity,
        duplicate:    bool,
        gems_awarded: u64,
    },
    DuplicatesConverted {
        removed:    u32,
        total_gems: u64,
    },
    InventoryCleared,

    // ── Companion ──────────────────────────────────
    PetFed {
        happiness: u8,
        level:     u32,
    },
    PetLeveledUp {
        level: u32,
    },
    PetRenamed {
        name: String,
    },
    SpeciesChanged {
        species: String,
    },
    AccessoryEquipped {
        item_id: String,
    },
    AccessoryUnequipped {
        item_id: String,
    },
    MoodPenaltyApplied {
        points:          u64,
        overdue_minutes: i64,
        happiness:       u8,
    },
    PetLeft {
        at: EpochMs,
    },
    PetReconciled {
        cost: u64,
    },

    // ── Tasks ──────────────────────────────────────
    TaskCreated {
        task_id: TaskId,
    },
    TaskCompleted {
        task_id: TaskId,
    },
    TaskReopened {
        task_id: TaskId,
    },
    TaskEdited {
        task_id: TaskId,
    },
    TaskRemoved {
        task_id: TaskId,
    },
    RemindersScheduled {
        task_id:   TaskId,
        scheduled: usize,
        planned:   usize,
    },
}

impl PetEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ProfileLoaded { .. }       => "profile_loaded",
            Self::GemsCredited { .. }        => "gems_credited",
            Self::GemsDebited { .. }         => "gems_debited",
            Self::ItemDrawn { .. }           => "item_drawn",
            Self::DuplicatesConverted { .. } => "duplicates_converted",
            Self::InventoryCleared           => "inventory_cleared",
            Self::PetFed { .. }              => "pet_fed",
            Self::PetLeveledUp { .. }        => "pet_leveled_up",
            Self::PetRenamed { .. }          => "pet_renamed",
            Self::SpeciesChanged { .. }      => "species_changed",
            Self::AccessoryEquipped { .. }   => "accessory_equipped",
            Self::AccessoryUnequipped { .. } => "accessory_unequipped",
            Self::MoodPenaltyApplied { .. }  => "mood_penalty_applied",
            Self::PetLeft { .. }             => "pet_left",
            Self::PetReconciled { .. }       => "pet_reconciled",
            Self::TaskCreated { .. }         => "task_created",
            Self::TaskCompleted { .. }       => "task_completed",
            Self::TaskReopened { .. }        => "task_reopened",
            Self::TaskEdited { .. }          => "task_edited",
            Self::TaskRemoved { .. }         => "task_removed",
            Self::RemindersScheduled { .. }  => "reminders_scheduled",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub profile_id: ProfileId,
    pub at_ms:      EpochMs,
    pub event_type: String,
    pub payload:    String, // JSON-serialized PetEvent
}
