//! Draw engine: the gacha pulls and duplicate accounting.
//!
//! Every pull is debit-first: the price leaves the ledger before any item
//! is rolled, and a short balance stops the pull with nothing changed.
//! A duplicate never adds a second copy to the collection; it pays out
//! the tier's duplicate value instead.

use crate::{
    catalog::{Item, Rarity},
    config::EngineConfig,
    ledger::Ledger,
    rng::DrawRng,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawResult {
    pub item:         Item,
    pub duplicate:    bool,
    /// Gems paid out for a duplicate. Zero for a new item.
    pub gems_awarded: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConvertLine {
    pub id:      String,
    pub name:    String,
    pub rarity:  Rarity,
    pub removed: u32,
    pub gems:    u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConvertSummary {
    pub total_gems: u64,
    pub lines:      Vec<ConvertLine>,
}

pub struct DrawEngine<'a> {
    config: &'a EngineConfig,
}

impl<'a> DrawEngine<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    fn duplicate_value(&self, rarity: Rarity) -> u64 {
        self.config.economy.duplicate_gems.for_rarity(rarity)
    }

    /// One paid pull. `None` means the balance could not cover the cost
    /// and the ledger is unchanged.
    pub fn single_draw(&self, ledger: &mut Ledger, rng: &mut DrawRng) -> Option<DrawResult> {
        if !ledger.debit(self.config.economy.single_draw_cost) {
            return None;
        }

        let item = self.config.catalog.weighted_draw(rng).clone();
        let result = if ledger.owns(&item.id) {
            let bonus = self.duplicate_value(item.rarity);
            ledger.credit(bonus);
            DrawResult { item, duplicate: true, gems_awarded: bonus }
        } else {
            ledger.append_items([item.clone()]);
            DrawResult { item, duplicate: false, gems_awarded: 0 }
        };

        log::info!(
            "draw: {} ({}) duplicate={} +{} gems",
            result.item.name, result.item.rarity.code(), result.duplicate, result.gems_awarded
        );
        Some(result)
    }

    /// A batch of `batch_size` pulls for one flat debit. Copies drawn earlier
    /// in the same batch count as owned for later draws. New items and
    /// duplicate payouts land in the ledger together after the last roll.
    pub fn batch_draw(&self, ledger: &mut Ledger, rng: &mut DrawRng) -> Option<Vec<DrawResult>> {
        let economy = &self.config.economy;
        if !ledger.debit(economy.batch_draw_cost) {
            return None;
        }

        let mut seen: HashSet<String> = ledger.inventory().iter().map(|i| i.id.clone()).collect();
        let mut added: Vec<Item> = Vec::new();
        let mut bonus_total = 0u64;
        let mut results = Vec::with_capacity(economy.batch_size);

        for _ in 0..economy.batch_size {
            let item = self.config.catalog.weighted_draw(rng).clone();
            if seen.contains(&item.id) {
                let bonus = self.duplicate_value(item.rarity);
                bonus_total += bonus;
                results.push(DrawResult { item, duplicate: true, gems_awarded: bonus });
            } else {
                seen.insert(item.id.clone());
                added.push(item.clone());
                results.push(DrawResult { item, duplicate: false, gems_awarded: 0 });
            }
        }

        let new_count = added.len();
        ledger.append_items(added);
        ledger.credit(bonus_total);

        log::info!(
            "draw: batch of {}: {new_count} new, +{bonus_total} gems from duplicates",
            results.len()
        );
        Some(results)
    }

    /// Keep the first copy of each item and turn the rest into gems.
    /// Lines are listed in first-seen order. Running it twice pays nothing
    /// the second time.
    pub fn convert_duplicates(&self, ledger: &mut Ledger) -> ConvertSummary {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<Item>> = HashMap::new();
        for item in ledger.inventory() {
            groups
                .entry(item.id.clone())
                .or_insert_with(|| {
                    order.push(item.id.clone());
                    Vec::new()
                })
                .push(item.clone());
        }

        let mut uniques = Vec::with_capacity(order.len());
        let mut summary = ConvertSummary::default();

        for id in order {
            let Some(mut copies) = groups.remove(&id) else { continue };
            let extras = copies.len().saturating_sub(1);
            copies.truncate(1);
            let keep = copies.remove(0);

            if extras > 0 {
                let gems = self.duplicate_value(keep.rarity) * extras as u64;
                summary.total_gems += gems;
                summary.lines.push(ConvertLine {
                    id: keep.id.clone(),
                    name: keep.name.clone(),
                    rarity: keep.rarity,
                    removed: extras as u32,
                    gems,
                });
            }
            uniques.push(keep);
        }

        ledger.replace_inventory(uniques);
        ledger.credit(summary.total_gems);
        summary
    }
}
