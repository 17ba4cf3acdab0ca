use crate::{
    draw_engine::{ConvertSummary, DrawResult},
    ledger::FeedOutcome,
    mood::AccrualReport,
    reminder::PlannedReminder,
    settings::{Intensity, Tone},
    task::{NewTask, Task, TaskPatch},
    types::TaskId,
};
use serde::{Deserialize, Serialize};

/// All commands a UI shell can issue against the engine.
/// Variants are appended over time, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Session ───────────────────────────────────
    SwitchProfile { identity: Option<String> },
    Foreground,

    // ── Gacha ─────────────────────────────────────
    PullOnce,
    PullTen,
    ConvertDuplicates,
    ClearInventory,

    // ── Shop (simulated, no payment) ──────────────
    BuyGems { amount: u64 },
    BuyFood,

    // ── Pet care ──────────────────────────────────
    Feed { amount: u32 },
    RenamePet { name: String },
    Equip { item_id: String },
    Unequip { item_id: String },
    SetActiveCreature { item_id: String },
    ReconcilePet { cost: Option<u64> },

    // ── Tasks ─────────────────────────────────────
    AddTask { task: NewTask },
    ToggleComplete { task_id: TaskId },
    EditTask { task_id: TaskId, patch: TaskPatch },
    RemoveTask { task_id: TaskId },
    ListTasks,
    PreviewReminders { task_id: TaskId },

    // ── Settings ──────────────────────────────────
    SetIntensity { intensity: Intensity },
    SetTone { tone: Tone },
}

/// Structured result for each command, ready for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum CommandReply {
    /// `result` is null when the balance was short.
    Draw { result: Option<DrawResult> },
    Batch { results: Option<Vec<DrawResult>> },
    Converted { summary: ConvertSummary },
    Fed { outcome: Option<FeedOutcome> },
    Accrual { report: Option<AccrualReport> },
    TaskCreated { task_id: TaskId },
    Tasks { tasks: Vec<Task> },
    Reminders { planned: Vec<PlannedReminder> },
    Done { ok: bool },
}
