//! Collection ledger: one profile's gems, collection and companion.
//!
//! Invariants held by every mutation:
//!   - gems never go negative (every spend is pre-checked by `debit`)
//!   - happiness stays in [0, 100]
//!   - equipped accessories are always owned Accessory items
//!   - the active species names an owned Creature once a starter is seeded
//!
//! The ledger is plain in-memory state. Persistence is the engine's job
//! and happens after each mutation.

use crate::{
    catalog::{Item, ItemCategory},
    config::PetDefaults,
    types::{EpochMs, ItemId},
};
use serde::{Deserialize, Serialize};

pub const MAX_HAPPINESS: u8 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub name:                 String,
    /// Display name of the active creature, e.g. "Ferret".
    pub species:              String,
    pub level:                u32,
    pub happiness:            u8,
    pub equipped_accessories: Vec<ItemId>,
    /// Set when happiness hit zero and the pet left. Cleared by reconcile.
    #[serde(default)]
    pub left_at:              Option<EpochMs>,
}

impl Pet {
    pub fn from_defaults(defaults: &PetDefaults) -> Self {
        Self {
            name: defaults.name.clone(),
            species: defaults.species.clone(),
            level: 1,
            happiness: defaults.happiness.min(MAX_HAPPINESS),
            equipped_accessories: Vec::new(),
            left_at: None,
        }
    }

    pub fn is_estranged(&self) -> bool {
        self.left_at.is_some()
    }
}

/// Result of a successful feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedOutcome {
    pub happiness: u8,
    pub level:     u32,
    pub leveled_up: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    gems:      u64,
    inventory: Vec<Item>,
    pet:       Pet,
}

impl Ledger {
    pub fn new(defaults: &PetDefaults) -> Self {
        Self {
            gems: 0,
            inventory: Vec::new(),
            pet: Pet::from_defaults(defaults),
        }
    }

    /// Rebuild from saved parts, repairing anything that breaks an invariant.
    pub fn from_parts(gems: u64, inventory: Vec<Item>, mut pet: Pet) -> Self {
        pet.happiness = pet.happiness.min(MAX_HAPPINESS);
        pet.level = pet.level.max(1);
        let mut ledger = Self { gems, inventory, pet };
        ledger.drop_unowned_accessories();
        ledger.repair_species();
        ledger
    }

    pub fn gems(&self) -> u64 { self.gems }
    pub fn inventory(&self) -> &[Item] { &self.inventory }
    pub fn pet(&self) -> &Pet { &self.pet }

    pub fn owns(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|i| i.id == item_id)
    }

    fn owned(&self, item_id: &str, category: ItemCategory) -> Option<&Item> {
        self.inventory
            .iter()
            .find(|i| i.id == item_id && i.category == category)
    }

    // ── Currency ───────────────────────────────────────────────

    pub fn credit(&mut self, amount: u64) {
        self.gems = self.gems.saturating_add(amount);
    }

    /// Spend `amount`. Returns false and leaves the balance untouched
    /// when the balance is short.
    pub fn debit(&mut self, amount: u64) -> bool {
        if self.gems < amount {
            return false;
        }
        self.gems -= amount;
        true
    }

    // ── Collection ─────────────────────────────────────────────

    pub(crate) fn append_items(&mut self, items: impl IntoIterator<Item = Item>) {
        self.inventory.extend(items);
    }

    pub(crate) fn replace_inventory(&mut self, inventory: Vec<Item>) {
        self.inventory = inventory;
        self.drop_unowned_accessories();
        self.repair_species();
    }

    pub fn clear_inventory(&mut self) {
        self.replace_inventory(Vec::new());
    }

    /// Put `starter` at the front of the collection if no creature is owned,
    /// then point the species at an owned creature.
    /// Returns true when the starter was added.
    pub fn ensure_starter(&mut self, starter: &Item) -> bool {
        let seeded = !self.inventory.iter().any(|i| i.category == ItemCategory::Creature);
        if seeded {
            self.inventory.insert(0, starter.clone());
        }
        self.repair_species();
        seeded
    }

    /// Species must name an owned creature. Falls back to the first one held;
    /// with no creature at all the name is left for `ensure_starter` to fix.
    fn repair_species(&mut self) {
        let mut creatures = self
            .inventory
            .iter()
            .filter(|i| i.category == ItemCategory::Creature);
        let Some(first) = creatures.clone().next() else { return };
        if !creatures.any(|c| c.name == self.pet.species) {
            log::debug!("ledger: species {} not owned, using {}", self.pet.species, first.name);
            self.pet.species = first.name.clone();
        }
    }

    fn drop_unowned_accessories(&mut self) {
        let inventory = &self.inventory;
        self.pet.equipped_accessories.retain(|id| {
            inventory
                .iter()
                .any(|i| &i.id == id && i.category == ItemCategory::Accessory)
        });
    }

    // ── Companion ──────────────────────────────────────────────

    /// Equip an owned accessory. Unowned ids are ignored.
    pub fn equip(&mut self, item_id: &str) -> bool {
        if self.owned(item_id, ItemCategory::Accessory).is_none() {
            return false;
        }
        if !self.pet.equipped_accessories.iter().any(|id| id == item_id) {
            self.pet.equipped_accessories.push(item_id.to_string());
        }
        true
    }

    pub fn unequip(&mut self, item_id: &str) -> bool {
        let before = self.pet.equipped_accessories.len();
        self.pet.equipped_accessories.retain(|id| id != item_id);
        before != self.pet.equipped_accessories.len()
    }

    /// Trimmed rename. Blank input keeps the current name.
    pub fn rename(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.pet.name = trimmed.to_string();
        true
    }

    /// Switch species to an owned creature. Unowned ids are ignored.
    pub fn set_active_creature(&mut self, item_id: &str) -> bool {
        let Some(species) = self
            .owned(item_id, ItemCategory::Creature)
            .map(|c| c.name.clone())
        else {
            return false;
        };
        self.pet.species = species;
        true
    }

    /// Add happiness. Landing on exactly 100 rolls over into the next level
    /// with `level_up_happiness` left. An estranged pet cannot be fed.
    pub fn feed(&mut self, delta: u32, level_up_happiness: u8) -> Option<FeedOutcome> {
        if self.pet.is_estranged() {
            return None;
        }
        let raised = u32::from(self.pet.happiness)
            .saturating_add(delta)
            .min(u32::from(MAX_HAPPINESS)) as u8;
        let leveled_up = raised == MAX_HAPPINESS;
        if leveled_up {
            self.pet.level += 1;
            self.pet.happiness = level_up_happiness.min(MAX_HAPPINESS);
        } else {
            self.pet.happiness = raised;
        }
        Some(FeedOutcome {
            happiness: self.pet.happiness,
            level: self.pet.level,
            leveled_up,
        })
    }

    /// Subtract overdue-penalty points. Reaching zero marks the pet as
    /// having left at `now`. No-op for zero points or an absent pet.
    /// Returns true when happiness changed.
    pub fn apply_mood_penalty(&mut self, points: u64, now: EpochMs) -> bool {
        if points == 0 || self.pet.is_estranged() {
            return false;
        }
        let hit = points.min(u64::from(self.pet.happiness)) as u8;
        self.pet.happiness -= hit;
        if self.pet.happiness == 0 {
            self.pet.left_at = Some(now);
        }
        true
    }

    /// Pay `cost` to bring the pet back at `happiness`.
    pub fn reconcile(&mut self, cost: u64, happiness: u8) -> bool {
        if !self.debit(cost) {
            return false;
        }
        self.pet.left_at = None;
        self.pet.happiness = happiness.min(MAX_HAPPINESS);
        true
    }
}
