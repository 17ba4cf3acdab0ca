//! Shared primitive types used across the entire engine.

/// Wall-clock instant in epoch milliseconds.
pub type EpochMs = i64;

/// Normalised profile identifier (trimmed, lower-cased email or "guest").
pub type ProfileId = String;

/// A stable catalog key, e.g. `"ferret"` or `"halo"`.
pub type ItemId = String;

/// Row id of a task in the store.
pub type TaskId = i64;

/// Opaque handle returned by the notifier for one scheduled reminder.
pub type TriggerHandle = String;

pub const MS_PER_SECOND: EpochMs = 1_000;
pub const MS_PER_MINUTE: EpochMs = 60_000;

/// Profile used when no identity is signed in.
pub const GUEST_PROFILE: &str = "guest";

/// Normalise an identity into the key every per-profile table uses.
pub fn profile_key(identity: Option<&str>) -> ProfileId {
    match identity.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => GUEST_PROFILE.to_string(),
    }
}
