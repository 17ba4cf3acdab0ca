//! User-facing reminder settings. Global, not per profile.

use serde::{Deserialize, Serialize};

/// How hard the app pushes: reminder density and mood-penalty severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intensity {
    Off,
    Light,
    #[default]
    Standard,
    Focused,
    Intense,
}

impl Intensity {
    pub fn has_post_due_stinger(&self) -> bool {
        matches!(self, Self::Focused | Self::Intense)
    }
}

/// Phrasing style for reminder bodies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tone {
    Neutral,
    Caring,
    #[default]
    Manipulative,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    pub intensity: Intensity,
    pub tone:      Tone,
}
