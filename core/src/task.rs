//! Commitments ("tasks") and the edits the UI can make to them.

use crate::types::{EpochMs, TaskId, TriggerHandle};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id:              TaskId,
    pub title:           String,
    pub notes:           Option<String>,
    /// Deadline in epoch ms. `None` means the task is never due.
    pub due_at:          Option<EpochMs>,
    pub completed:       bool,
    /// Notifier handles for reminders currently scheduled for this task.
    pub trigger_handles: Vec<TriggerHandle>,
}

impl Task {
    /// Incomplete with a deadline strictly before `now`.
    pub fn is_overdue(&self, now: EpochMs) -> bool {
        !self.completed && self.due_at.is_some_and(|due| due < now)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    pub title:  String,
    #[serde(default)]
    pub notes:  Option<String>,
    #[serde(default)]
    pub due_at: Option<EpochMs>,
}

/// Partial update. `None` leaves a field alone; for the nullable fields,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskPatch {
    #[serde(default)]
    pub title:     Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub notes:     Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub due_at:    Option<Option<EpochMs>>,
    /// Handled by the engine's completion toggle, never by `apply`.
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Title or deadline changes invalidate already-scheduled reminders.
    pub fn touches_schedule(&self) -> bool {
        self.title.is_some() || self.due_at.is_some()
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(notes) = &self.notes {
            task.notes = notes.clone();
        }
        if let Some(due_at) = self.due_at {
            task.due_at = due_at;
        }
    }
}

// A key that is present maps to Some(..) even when its value is null.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
