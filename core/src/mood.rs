//! Mood penalty accrual: overdue tasks make the pet unhappy.
//!
//! Runs on app foreground and on every profile switch. Each profile keeps
//! its own last-check instant, so time is never counted twice and never
//! lost when switching between users.
//!
//! ORDER MATTERS: the new last-check is written before any task is read.
//! A second pass for the same profile (a retry or an overlapping trigger)
//! then starts from the fresh instant and finds nothing new to charge.

use crate::{
    error::PetResult,
    ledger::Ledger,
    settings::Intensity,
    store::PetStore,
    task::Task,
    types::{EpochMs, MS_PER_MINUTE},
};
use serde::{Deserialize, Serialize};

/// Overdue minutes that cost one happiness point. `None` disables accrual.
///   LIGHT 1/day   STANDARD 1/12h   FOCUSED 1/6h   INTENSE 1/h
pub fn minutes_per_point(intensity: Intensity) -> Option<i64> {
    match intensity {
        Intensity::Off      => None,
        Intensity::Light    => Some(24 * 60),
        Intensity::Standard => Some(12 * 60),
        Intensity::Focused  => Some(6 * 60),
        Intensity::Intense  => Some(60),
    }
}

/// Whole overdue minutes accrued by `task` in the window since `previous_check`.
/// Only time after the deadline counts.
pub fn overdue_slice_minutes(task: &Task, previous_check: EpochMs, now: EpochMs) -> i64 {
    if !task.is_overdue(now) {
        return 0;
    }
    let Some(due) = task.due_at else { return 0 };
    let start = previous_check.max(due);
    ((now - start) / MS_PER_MINUTE).max(0)
}

/// Sum the slices across tasks and floor to whole points.
/// Accrual is summed in minutes first so sub-point slices from several
/// tasks still add up.
pub fn overdue_points(tasks: &[Task], previous_check: EpochMs, now: EpochMs, minutes_per_point: i64) -> (i64, u64) {
    let minutes: i64 = tasks
        .iter()
        .map(|t| overdue_slice_minutes(t, previous_check, now))
        .sum();
    (minutes, (minutes / minutes_per_point.max(1)) as u64)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccrualReport {
    pub previous_check:  EpochMs,
    pub checked_at:      EpochMs,
    pub overdue_minutes: i64,
    pub points:          u64,
    /// False when points were zero or the pet had already left.
    pub applied:         bool,
}

/// One accrual pass for `profile_id`. Returns `None` when intensity is OFF.
pub fn run_accrual(
    store: &PetStore,
    profile_id: &str,
    intensity: Intensity,
    ledger: &mut Ledger,
    now: EpochMs,
) -> PetResult<Option<AccrualReport>> {
    let previous_check = store.last_mood_check(profile_id)?.unwrap_or(now);
    store.set_last_mood_check(profile_id, now)?;

    let Some(mpp) = minutes_per_point(intensity) else {
        return Ok(None);
    };

    let tasks = store.tasks_for_profile(profile_id)?;
    let (overdue_minutes, points) = overdue_points(&tasks, previous_check, now, mpp);
    let applied = points > 0 && ledger.apply_mood_penalty(points, now);

    if applied {
        log::info!(
            "mood: profile={profile_id} -{points} happiness ({overdue_minutes} overdue min), now {}",
            ledger.pet().happiness
        );
    } else {
        log::debug!("mood: profile={profile_id} nothing to apply ({overdue_minutes} overdue min)");
    }

    Ok(Some(AccrualReport {
        previous_check,
        checked_at: now,
        overdue_minutes,
        points,
        applied,
    }))
}
