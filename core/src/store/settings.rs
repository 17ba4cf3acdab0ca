use super::PetStore;
use crate::{
    error::PetResult,
    settings::{Intensity, Settings, Tone},
};
use rusqlite::{params, OptionalExtension};

impl PetStore {
    /// Saved settings, or `None` if nothing was ever saved.
    pub fn load_settings(&self) -> PetResult<Option<Settings>> {
        let row = self
            .conn
            .query_row(
                "SELECT intensity, tone FROM settings WHERE id = 1",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        let Some((intensity, tone)) = row else {
            return Ok(None);
        };
        // Stored as the JSON string form of each enum.
        let intensity: Intensity = serde_json::from_value(serde_json::Value::String(intensity))?;
        let tone: Tone = serde_json::from_value(serde_json::Value::String(tone))?;
        Ok(Some(Settings { intensity, tone }))
    }

    pub fn save_settings(&self, settings: &Settings) -> PetResult<()> {
        let intensity = enum_text(&settings.intensity)?;
        let tone = enum_text(&settings.tone)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (id, intensity, tone) VALUES (1, ?1, ?2)",
            params![intensity, tone],
        )?;
        Ok(())
    }
}

fn enum_text<T: serde::Serialize>(value: &T) -> PetResult<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}
