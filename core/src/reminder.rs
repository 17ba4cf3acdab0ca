//! Reminder planning: pure, no side effects.
//!
//! `plan()` turns a task into the list of notifications to register. The
//! engine hands each entry to the `Notifier` and keeps the handles.
//!
//! Offsets (minutes before due) by intensity:
//!   OFF       none
//!   LIGHT     1h
//!   STANDARD  1d, 1h
//!   FOCUSED   2d, 12h, 1h, 15m        + stinger 30m after due
//!   INTENSE   7d, 3d, 1d, 12h, 1h, 30m, 10m, 5m   + stinger

use crate::{
    settings::{Intensity, Tone},
    task::Task,
    types::{EpochMs, MS_PER_MINUTE, MS_PER_SECOND},
};
use serde::{Deserialize, Serialize};

/// Nothing is scheduled closer to `now` than this.
pub const MIN_LEAD_MS: EpochMs = 15 * MS_PER_SECOND;
pub const POST_DUE_MINUTES: i64 = 30;

pub const PRE_DUE_TITLE: &str = "Task reminder";
pub const POST_DUE_TITLE: &str = "Past due";

const DAY_MINUTES: i64 = 24 * 60;

pub fn offset_ladder(intensity: Intensity) -> &'static [i64] {
    match intensity {
        Intensity::Off      => &[],
        Intensity::Light    => &[60],
        Intensity::Standard => &[DAY_MINUTES, 60],
        Intensity::Focused  => &[2 * DAY_MINUTES, 12 * 60, 60, 15],
        Intensity::Intense  => &[7 * DAY_MINUTES, 3 * DAY_MINUTES, DAY_MINUTES, 12 * 60, 60, 30, 10, 5],
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReminderKind {
    PreDue { minutes_before: i64 },
    PostDue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedReminder {
    pub trigger_at: EpochMs,
    pub kind:       ReminderKind,
    pub title:      String,
    pub body:       String,
}

/// Plan reminders for `task` as of `now`. Undated tasks and `Intensity::Off`
/// plan nothing. Triggers at or before `now` are dropped; triggers inside
/// the lead cushion are pushed out to exactly `now + MIN_LEAD_MS`.
pub fn plan(
    task: &Task,
    intensity: Intensity,
    tone: Tone,
    pet_name: &str,
    now: EpochMs,
) -> Vec<PlannedReminder> {
    let Some(due) = task.due_at else {
        return Vec::new();
    };
    if intensity == Intensity::Off {
        return Vec::new();
    }
    let pet_name = if pet_name.trim().is_empty() { "Your pet" } else { pet_name };

    let mut out = Vec::new();
    for &minutes in offset_ladder(intensity) {
        let trigger = due - minutes * MS_PER_MINUTE;
        if trigger <= now {
            continue;
        }
        out.push(PlannedReminder {
            trigger_at: with_cushion(trigger, now),
            kind: ReminderKind::PreDue { minutes_before: minutes },
            title: PRE_DUE_TITLE.to_string(),
            body: pre_due_body(pet_name, &task.title, minutes, tone),
        });
    }

    if intensity.has_post_due_stinger() && due > now {
        let trigger = due + POST_DUE_MINUTES * MS_PER_MINUTE;
        out.push(PlannedReminder {
            trigger_at: with_cushion(trigger, now),
            kind: ReminderKind::PostDue,
            title: POST_DUE_TITLE.to_string(),
            body: post_due_body(pet_name, &task.title),
        });
    }

    log::debug!(
        "reminder: planned {} trigger(s) for task {} ({intensity:?}/{tone:?})",
        out.len(),
        task.id
    );
    out
}

fn with_cushion(trigger: EpochMs, now: EpochMs) -> EpochMs {
    trigger.max(now + MIN_LEAD_MS)
}

/// "2 day(s)", "3 hour(s)", "10 minute(s)".
pub fn humanize_minutes(minutes: i64) -> String {
    if minutes >= DAY_MINUTES {
        format!("{} day(s)", (minutes as f64 / DAY_MINUTES as f64).round() as i64)
    } else if minutes >= 60 {
        format!("{} hour(s)", (minutes as f64 / 60.0).round() as i64)
    } else {
        format!("{minutes} minute(s)")
    }
}

pub fn pre_due_body(pet_name: &str, title: &str, minutes_before: i64, tone: Tone) -> String {
    let delta = humanize_minutes(minutes_before);
    match tone {
        Tone::Neutral => format!("{title} is due in {delta}."),
        Tone::Caring => {
            if minutes_before >= 60 {
                format!("{pet_name} wants to remind you: “{title}” is due in {delta} 💛")
            } else if minutes_before >= 15 {
                format!("{pet_name} is cheering for you! “{title}” in {delta} ✨")
            } else {
                format!("{pet_name}: You got this! “{title}” is almost due!")
            }
        }
        Tone::Manipulative => {
            if minutes_before >= DAY_MINUTES {
                format!("{pet_name} is thinking about “{title}” (due in {delta}). Don’t make them worry…")
            } else if minutes_before >= 60 {
                format!("{pet_name} really needs you to handle “{title}” (due in {delta}).")
            } else if minutes_before >= 15 {
                format!("{pet_name} is getting nervous… “{title}” is due in {delta}.")
            } else if minutes_before >= 5 {
                format!("{pet_name} is kind of disappointed you haven’t finished “{title}” yet. It’s due in {delta}.")
            } else {
                format!("{pet_name} is VERY disappointed you still haven’t finished “{title}.”")
            }
        }
    }
}

pub fn post_due_body(pet_name: &str, title: &str) -> String {
    format!("{pet_name} is very disappointed you still haven’t finished “{title}.”")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanized_deltas() {
        assert_eq!(humanize_minutes(10_080), "7 day(s)");
        assert_eq!(humanize_minutes(720), "12 hour(s)");
        assert_eq!(humanize_minutes(60), "1 hour(s)");
        assert_eq!(humanize_minutes(15), "15 minute(s)");
    }

    #[test]
    fn neutral_body_is_factual() {
        assert_eq!(
            pre_due_body("Pico", "Taxes", 1440, Tone::Neutral),
            "Taxes is due in 1 day(s)."
        );
    }

    #[test]
    fn manipulative_bands_escalate() {
        let bodies: Vec<String> = [1440, 60, 15, 5, 4]
            .iter()
            .map(|m| pre_due_body("Pico", "Taxes", *m, Tone::Manipulative))
            .collect();
        assert!(bodies[0].contains("Don’t make them worry"));
        assert!(bodies[1].contains("really needs you"));
        assert!(bodies[2].contains("getting nervous"));
        assert!(bodies[3].contains("kind of disappointed"));
        assert!(bodies[4].contains("VERY disappointed"));
    }

    #[test]
    fn caring_has_three_bands() {
        assert!(pre_due_body("Pico", "Gym", 60, Tone::Caring).contains("wants to remind you"));
        assert!(pre_due_body("Pico", "Gym", 15, Tone::Caring).contains("cheering for you"));
        assert!(pre_due_body("Pico", "Gym", 10, Tone::Caring).contains("almost due"));
    }
}
