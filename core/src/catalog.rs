//! Reward catalog: the static table of collectible items.
//!
//! Items are immutable. A held copy in a collection is a clone of the
//! catalog entry, so saved collections survive catalog edits.
//!
//! Draw odds (cumulative over a uniform [0, 100) roll):
//!   Common      60%   [0, 60)
//!   Rare        28%   [60, 88)
//!   Super-Rare  10%   [88, 98)
//!   Ultra-Rare   2%   [98, 100)

use crate::{
    error::{PetError, PetResult},
    rng::DrawRng,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    #[serde(rename = "C")]
    Common,
    #[serde(rename = "R")]
    Rare,
    #[serde(rename = "SR")]
    SuperRare,
    #[serde(rename = "UR")]
    UltraRare,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Self::Common, Self::Rare, Self::SuperRare, Self::UltraRare];

    /// Map a [0, 100) roll onto a tier.
    pub fn from_roll(percent: f64) -> Self {
        if percent < 60.0 {
            Self::Common
        } else if percent < 88.0 {
            Self::Rare
        } else if percent < 98.0 {
            Self::SuperRare
        } else {
            Self::UltraRare
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Common    => "C",
            Self::Rare      => "R",
            Self::SuperRare => "SR",
            Self::UltraRare => "UR",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Accessory,
    Consumable,
    Creature,
    Misc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id:       String,
    pub name:     String,
    pub rarity:   Rarity,
    pub category: ItemCategory,
}

impl Item {
    pub fn new(id: &str, name: &str, rarity: Rarity, category: ItemCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rarity,
            category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<Item>,
}

impl Catalog {
    /// Build and validate. Fails if any tier is empty or an id repeats.
    pub fn new(items: Vec<Item>) -> PetResult<Self> {
        let catalog = Self { items };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The shipped pool: six creatures and four accessories.
    pub fn builtin() -> Self {
        use ItemCategory::*;
        use Rarity::*;
        Self {
            items: vec![
                Item::new("panda",      "Panda",        Rare,      Creature),
                Item::new("ferret",     "Ferret",       Common,    Creature),
                Item::new("raccoon",    "Raccoon",      Common,    Creature),
                Item::new("nessie",     "Nessie",       SuperRare, Creature),
                Item::new("mothman",    "Mothman",      SuperRare, Creature),
                Item::new("chupacabra", "Chupacabra",   UltraRare, Creature),
                Item::new("bow_red",    "Red Bow",      Common,    Accessory),
                Item::new("cap_blue",   "Blue Cap",     Rare,      Accessory),
                Item::new("halo",       "Halo",         SuperRare, Accessory),
                Item::new("crown",      "Golden Crown", UltraRare, Accessory),
            ],
        }
    }

    pub fn validate(&self) -> PetResult<()> {
        for rarity in Rarity::ALL {
            if !self.items.iter().any(|i| i.rarity == rarity) {
                return Err(PetError::CatalogTierEmpty { rarity });
            }
        }
        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(PetError::DuplicateItem { id: item.id.clone() });
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn of_rarity(&self, rarity: Rarity) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |i| i.rarity == rarity)
    }

    /// One rarity-weighted draw: pick the tier, then an item uniformly
    /// within it. Tiers are guaranteed non-empty by `validate()`.
    pub fn weighted_draw(&self, rng: &mut DrawRng) -> &Item {
        let rarity = Rarity::from_roll(rng.next_percent());
        let candidates: Vec<&Item> = self.of_rarity(rarity).collect();
        let idx = rng.next_u64_below(candidates.len() as u64) as usize;
        candidates[idx]
    }
}
