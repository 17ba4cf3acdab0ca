//! Per-profile task rows. Trigger handles are kept as a JSON array.

use super::PetStore;
use crate::{
    error::{PetError, PetResult},
    task::{NewTask, Task},
    types::{TaskId, TriggerHandle},
};
use rusqlite::{params, OptionalExtension, Row};

const TASK_COLUMNS: &str = "id, title, notes, due_at, completed, notif_ids";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let notif_ids: String = row.get(5)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        notes: row.get(2)?,
        due_at: row.get(3)?,
        completed: row.get::<_, i64>(4)? != 0,
        trigger_handles: parse_handles(&notif_ids),
    })
}

/// Unreadable handle lists are treated as empty.
fn parse_handles(raw: &str) -> Vec<TriggerHandle> {
    serde_json::from_str(raw).unwrap_or_default()
}

impl PetStore {
    pub fn insert_task(&self, profile_id: &str, task: &NewTask) -> PetResult<TaskId> {
        self.conn.execute(
            "INSERT INTO task (profile_id, title, notes, due_at, completed, notif_ids)
             VALUES (?1, ?2, ?3, ?4, 0, '[]')",
            params![profile_id, task.title, task.notes, task.due_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn task(&self, profile_id: &str, id: TaskId) -> PetResult<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM task WHERE profile_id = ?1 AND id = ?2"),
                params![profile_id, id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// Incomplete first, then by deadline (undated last), newest first on ties.
    pub fn tasks_for_profile(&self, profile_id: &str) -> PetResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM task WHERE profile_id = ?1
             ORDER BY completed ASC, due_at IS NULL ASC, due_at ASC, id DESC"
        ))?;
        let tasks = stmt
            .query_map(params![profile_id], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Overwrite every mutable column of an existing task.
    pub fn update_task(&self, profile_id: &str, task: &Task) -> PetResult<()> {
        let handles = serde_json::to_string(&task.trigger_handles)?;
        let changed = self.conn.execute(
            "UPDATE task SET title = ?1, notes = ?2, due_at = ?3, completed = ?4, notif_ids = ?5
             WHERE profile_id = ?6 AND id = ?7",
            params![
                task.title,
                task.notes,
                task.due_at,
                task.completed as i64,
                handles,
                profile_id,
                task.id,
            ],
        )?;
        if changed == 0 {
            return Err(PetError::TaskNotFound { id: task.id });
        }
        Ok(())
    }

    pub fn delete_task(&self, profile_id: &str, id: TaskId) -> PetResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM task WHERE profile_id = ?1 AND id = ?2",
            params![profile_id, id],
        )?;
        Ok(changed > 0)
    }
}
