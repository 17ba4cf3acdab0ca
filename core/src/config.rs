use crate::{
    catalog::{Catalog, Item, ItemCategory, Rarity},
    error::{PetError, PetResult},
};
use serde::{Deserialize, Serialize};

/// Gems credited when a drawn or held copy is converted as a duplicate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuplicateGems {
    pub common:     u64,
    pub rare:       u64,
    pub super_rare: u64,
    pub ultra_rare: u64,
}

impl DuplicateGems {
    pub fn for_rarity(&self, rarity: Rarity) -> u64 {
        match rarity {
            Rarity::Common    => self.common,
            Rarity::Rare      => self.rare,
            Rarity::SuperRare => self.super_rare,
            Rarity::UltraRare => self.ultra_rare,
        }
    }
}

impl Default for DuplicateGems {
    fn default() -> Self {
        Self { common: 1, rare: 5, super_rare: 10, ultra_rare: 50 }
    }
}

/// Companion record handed to a profile that has never been saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetDefaults {
    pub name:      String,
    pub species:   String,
    pub happiness: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConfig {
    pub single_draw_cost:   u64,
    /// Flat price for a batch. No multi-draw discount.
    pub batch_draw_cost:    u64,
    pub batch_size:         usize,
    pub duplicate_gems:     DuplicateGems,
    pub reconcile_cost:     u64,
    /// Happiness a reconciled companion comes back with.
    pub reconcile_happiness: u8,
    /// Happiness left over after a level-up.
    pub level_up_happiness: u8,
    pub completion_reward:  u64,
    pub food_cost:          u64,
    pub food_happiness:     u8,
    pub starter_creature:   String,
    pub pet_defaults:       PetDefaults,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            single_draw_cost: 10,
            batch_draw_cost: 100,
            batch_size: 10,
            duplicate_gems: DuplicateGems::default(),
            reconcile_cost: 50,
            reconcile_happiness: 50,
            level_up_happiness: 20,
            completion_reward: 5,
            food_cost: 2,
            food_happiness: 10,
            starter_creature: "ferret".into(),
            pet_defaults: PetDefaults {
                name: "Pico".into(),
                species: "Ferret".into(),
                happiness: 50,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub economy: EconomyConfig,
    pub catalog: Catalog,
}

impl EngineConfig {
    /// Load from the data/ directory and validate.
    /// In tests, use EngineConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let economy_path = format!("{data_dir}/economy/economy.json");
        let economy_content = std::fs::read_to_string(&economy_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {economy_path}: {e}"))?;
        let economy: EconomyConfig = serde_json::from_str(&economy_content)?;

        let catalog_path = format!("{data_dir}/catalog/catalog.json");
        let catalog_content = std::fs::read_to_string(&catalog_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {catalog_path}: {e}"))?;
        let catalog_file: CatalogFile = serde_json::from_str(&catalog_content)?;

        let config = Self {
            economy,
            catalog: Catalog { items: catalog_file.items },
        };
        config.validate()?;
        log::info!(
            "config: loaded {} catalog items from {data_dir}",
            config.catalog.items.len()
        );
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Matches the shipped data/ files.
    pub fn default_test() -> Self {
        Self {
            economy: EconomyConfig::default(),
            catalog: Catalog::builtin(),
        }
    }

    /// Startup validation: every tier drawable, starter is a creature.
    pub fn validate(&self) -> PetResult<()> {
        self.catalog.validate()?;
        match self.catalog.get(&self.economy.starter_creature) {
            Some(item) if item.category == ItemCategory::Creature => Ok(()),
            _ => Err(PetError::UnknownStarter {
                id: self.economy.starter_creature.clone(),
            }),
        }
    }

    pub fn starter_item(&self) -> Option<&Item> {
        self.catalog.get(&self.economy.starter_creature)
    }
}
