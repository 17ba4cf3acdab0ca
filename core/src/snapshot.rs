//! Profile snapshot: a profile's ledger to/from JSON.
//!
//! One snapshot row per profile is rewritten after every ledger mutation.
//! Loading is lenient: missing gems or inventory fall back to empty, each
//! missing pet field falls back to its default, and only a record that is
//! not JSON at all starts a fresh ledger.

use crate::{
    catalog::Item,
    config::PetDefaults,
    ledger::{Ledger, Pet},
    types::{EpochMs, ItemId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSnapshot {
    #[serde(default)]
    pub gems:      u64,
    pub pet:       Pet,
    #[serde(default)]
    pub inventory: Vec<Item>,
}

/// Saved record as read back, with every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SavedProfile {
    gems:      u64,
    inventory: Vec<Item>,
    pet:       Option<SavedPet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SavedPet {
    name:                 Option<String>,
    species:              Option<String>,
    level:                Option<u32>,
    happiness:            Option<u8>,
    equipped_accessories: Option<Vec<ItemId>>,
    left_at:              Option<EpochMs>,
}

impl SavedPet {
    fn into_pet(self, defaults: &PetDefaults) -> Pet {
        let fresh = Pet::from_defaults(defaults);
        Pet {
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(fresh.name),
            species: self.species.unwrap_or(fresh.species),
            level: self.level.unwrap_or(fresh.level),
            happiness: self.happiness.unwrap_or(fresh.happiness),
            equipped_accessories: self.equipped_accessories.unwrap_or_default(),
            left_at: self.left_at,
        }
    }
}

impl ProfileSnapshot {
    pub fn of(ledger: &Ledger) -> Self {
        Self {
            gems: ledger.gems(),
            pet: ledger.pet().clone(),
            inventory: ledger.inventory().to_vec(),
        }
    }

    pub fn into_ledger(self) -> Ledger {
        Ledger::from_parts(self.gems, self.inventory, self.pet)
    }

    /// Parse a saved record, filling gaps from `defaults`. Starts fresh only
    /// when the record is unreadable.
    pub fn restore(json: &str, defaults: &PetDefaults) -> Ledger {
        match serde_json::from_str::<SavedProfile>(json) {
            Ok(saved) => {
                let pet = saved.pet.unwrap_or_default().into_pet(defaults);
                Ledger::from_parts(saved.gems, saved.inventory, pet)
            }
            Err(e) => {
                log::warn!("snapshot: unreadable profile record, starting fresh: {e}");
                Ledger::new(defaults)
            }
        }
    }
}
