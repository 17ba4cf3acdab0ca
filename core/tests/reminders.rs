//! Reminder planning against the intensity ladders.

use taskpet_core::{
    reminder::{self, PlannedReminder, ReminderKind, MIN_LEAD_MS},
    settings::{Intensity, Tone},
    task::Task,
    types::MS_PER_MINUTE,
};

const NOW: i64 = 1_700_000_000_000;
const ALL: [Intensity; 5] = [
    Intensity::Off,
    Intensity::Light,
    Intensity::Standard,
    Intensity::Focused,
    Intensity::Intense,
];

fn task_due(due_at: Option<i64>) -> Task {
    Task {
        id: 1,
        title: "Submit taxes".into(),
        notes: None,
        due_at,
        completed: false,
        trigger_handles: Vec::new(),
    }
}

fn plan(due_at: Option<i64>, intensity: Intensity) -> Vec<PlannedReminder> {
    reminder::plan(&task_due(due_at), intensity, Tone::Neutral, "Pico", NOW)
}

fn minutes(m: i64) -> i64 {
    m * MS_PER_MINUTE
}

#[test]
fn off_or_undated_plans_nothing() {
    assert!(plan(Some(NOW + minutes(10_000)), Intensity::Off).is_empty());
    for intensity in ALL {
        assert!(plan(None, intensity).is_empty(), "{intensity:?}");
    }
}

#[test]
fn far_deadline_gets_the_full_ladder() {
    let due = NOW + minutes(30 * 24 * 60);
    assert_eq!(plan(Some(due), Intensity::Light).len(), 1);
    assert_eq!(plan(Some(due), Intensity::Standard).len(), 2);
    assert_eq!(plan(Some(due), Intensity::Focused).len(), 5, "four offsets plus stinger");
    assert_eq!(plan(Some(due), Intensity::Intense).len(), 9, "eight offsets plus stinger");

    let standard = plan(Some(due), Intensity::Standard);
    assert_eq!(standard[0].trigger_at, due - minutes(1440));
    assert_eq!(standard[1].trigger_at, due - minutes(60));
    assert_eq!(standard[1].body, "Submit taxes is due in 1 hour(s).");
}

#[test]
fn no_trigger_lands_at_or_before_now() {
    for intensity in ALL {
        for offset_min in (-180..=11_000).step_by(7) {
            let due = NOW + minutes(offset_min);
            for r in plan(Some(due), intensity) {
                assert!(
                    r.trigger_at >= NOW + MIN_LEAD_MS,
                    "{intensity:?} due {offset_min}m: trigger {} too early",
                    r.trigger_at - NOW
                );
            }
        }
    }
}

#[test]
fn trigger_inside_cushion_is_pushed_to_exactly_fifteen_seconds() {
    let due = NOW + minutes(60) + 10_000;
    let planned = plan(Some(due), Intensity::Light);
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].trigger_at, NOW + MIN_LEAD_MS);
    assert_eq!(planned[0].kind, ReminderKind::PreDue { minutes_before: 60 });
}

#[test]
fn near_deadline_keeps_only_future_rungs() {
    let due = NOW + minutes(20);
    let planned = plan(Some(due), Intensity::Intense);
    let kinds: Vec<ReminderKind> = planned.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ReminderKind::PreDue { minutes_before: 10 },
            ReminderKind::PreDue { minutes_before: 5 },
            ReminderKind::PostDue,
        ]
    );
    assert_eq!(planned[2].trigger_at, due + minutes(30));
    assert_eq!(planned[2].title, reminder::POST_DUE_TITLE);
}

#[test]
fn stinger_only_for_focused_and_intense_with_future_deadline() {
    let due = NOW + minutes(3 * 24 * 60);
    let has_stinger = |intensity| {
        plan(Some(due), intensity)
            .iter()
            .any(|r| r.kind == ReminderKind::PostDue)
    };
    assert!(!has_stinger(Intensity::Light));
    assert!(!has_stinger(Intensity::Standard));
    assert!(has_stinger(Intensity::Focused));
    assert!(has_stinger(Intensity::Intense));

    let past_due = NOW - minutes(5);
    assert!(plan(Some(past_due), Intensity::Intense).is_empty());
}

#[test]
fn bodies_use_pet_name_and_fall_back_when_blank() {
    let due = NOW + minutes(30 * 24 * 60);
    let caring = reminder::plan(&task_due(Some(due)), Intensity::Light, Tone::Caring, "Biscuit", NOW);
    assert!(caring[0].body.starts_with("Biscuit"), "{}", caring[0].body);

    let nameless = reminder::plan(&task_due(Some(due)), Intensity::Light, Tone::Caring, "  ", NOW);
    assert!(nameless[0].body.starts_with("Your pet"), "{}", nameless[0].body);
}
