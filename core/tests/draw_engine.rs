//! Draw engine: pull pricing and duplicate handling.

use taskpet_core::{
    catalog::{Catalog, Item, ItemCategory, Rarity},
    config::{EconomyConfig, EngineConfig},
    draw_engine::{ConvertLine, DrawEngine},
    ledger::{Ledger, Pet},
    rng::{RngBank, RngSlot},
};

fn ledger(gems: u64, inventory: Vec<Item>) -> Ledger {
    let pet = Pet::from_defaults(&EconomyConfig::default().pet_defaults);
    Ledger::from_parts(gems, inventory, pet)
}

/// One item per tier, so any batch of ten is forced to repeat.
fn tiny_config() -> EngineConfig {
    let catalog = Catalog::new(vec![
        Item::new("ferret",   "Ferret",       Rarity::Common,    ItemCategory::Creature),
        Item::new("cap_blue", "Blue Cap",     Rarity::Rare,      ItemCategory::Accessory),
        Item::new("halo",     "Halo",         Rarity::SuperRare, ItemCategory::Accessory),
        Item::new("crown",    "Golden Crown", Rarity::UltraRare, ItemCategory::Accessory),
    ])
    .expect("valid catalog");
    EngineConfig { economy: EconomyConfig::default(), catalog }
}

fn item(id: &str) -> Item {
    Catalog::builtin().get(id).cloned().expect("catalog item")
}

#[test]
fn single_draw_without_funds_changes_nothing() {
    let config = EngineConfig::default_test();
    let engine = DrawEngine::new(&config);
    let mut rng = RngBank::new(1).for_slot(RngSlot::Gacha);

    let mut ledger = ledger(9, vec![item("ferret")]);
    let before = ledger.clone();

    assert!(engine.single_draw(&mut ledger, &mut rng).is_none());
    assert_eq!(ledger, before);
}

#[test]
fn single_draw_charges_ten_and_records_new_item() {
    let config = EngineConfig::default_test();
    let engine = DrawEngine::new(&config);
    let mut rng = RngBank::new(77).for_slot(RngSlot::Gacha);

    let mut ledger = ledger(10, Vec::new());
    let result = engine.single_draw(&mut ledger, &mut rng).expect("affordable");

    assert!(!result.duplicate, "empty collection cannot hold a duplicate");
    assert_eq!(result.gems_awarded, 0);
    assert_eq!(ledger.gems(), 0);
    assert_eq!(ledger.inventory(), &[result.item]);
}

#[test]
fn single_draw_duplicate_pays_tier_value_without_new_copy() {
    let config = tiny_config();
    let engine = DrawEngine::new(&config);
    let mut rng = RngBank::new(5).for_slot(RngSlot::Gacha);

    let everything: Vec<Item> = config.catalog.items.clone();
    let mut ledger = ledger(10, everything.clone());

    let result = engine.single_draw(&mut ledger, &mut rng).expect("affordable");
    assert!(result.duplicate);
    let expected = config.economy.duplicate_gems.for_rarity(result.item.rarity);
    assert_eq!(result.gems_awarded, expected);
    assert_eq!(ledger.gems(), expected);
    assert_eq!(ledger.inventory().len(), everything.len());
}

#[test]
fn batch_draw_debits_flat_hundred() {
    let config = EngineConfig::default_test();
    let engine = DrawEngine::new(&config);

    for seed in [1u64, 2, 3, 42, 0xDEAD_BEEF] {
        let mut rng = RngBank::new(seed).for_slot(RngSlot::Gacha);
        let mut ledger = ledger(130, vec![item("ferret")]);

        let results = engine.batch_draw(&mut ledger, &mut rng).expect("affordable");
        assert_eq!(results.len(), 10);

        let awarded: u64 = results.iter().map(|r| r.gems_awarded).sum();
        assert_eq!(ledger.gems(), 130 - 100 + awarded, "seed {seed}");
    }
}

#[test]
fn batch_draw_without_funds_changes_nothing() {
    let config = EngineConfig::default_test();
    let engine = DrawEngine::new(&config);
    let mut rng = RngBank::new(9).for_slot(RngSlot::Gacha);

    let mut ledger = ledger(99, Vec::new());
    let before = ledger.clone();
    assert!(engine.batch_draw(&mut ledger, &mut rng).is_none());
    assert_eq!(ledger, before);
}

#[test]
fn batch_draw_detects_duplicates_within_the_batch() {
    let config = tiny_config();
    let engine = DrawEngine::new(&config);
    let mut rng = RngBank::new(0xC0FFEE).for_slot(RngSlot::Gacha);

    let mut ledger = ledger(100, Vec::new());
    let results = engine.batch_draw(&mut ledger, &mut rng).expect("affordable");

    let mut seen = std::collections::HashSet::new();
    for (i, r) in results.iter().enumerate() {
        let first_time = seen.insert(r.item.id.clone());
        assert_eq!(r.duplicate, !first_time, "draw {i} ({}) misclassified", r.item.id);
    }
    // Four tiers, ten draws: at least six repeats.
    assert!(results.iter().filter(|r| r.duplicate).count() >= 6);
    assert_eq!(ledger.inventory().len(), seen.len());
}

#[test]
fn same_seed_same_pulls() {
    let config = EngineConfig::default_test();
    let engine = DrawEngine::new(&config);

    let mut a = ledger(500, Vec::new());
    let mut b = ledger(500, Vec::new());
    let mut rng_a = RngBank::new(31337).for_slot(RngSlot::Gacha);
    let mut rng_b = RngBank::new(31337).for_slot(RngSlot::Gacha);

    for _ in 0..3 {
        assert_eq!(
            engine.batch_draw(&mut a, &mut rng_a),
            engine.batch_draw(&mut b, &mut rng_b)
        );
    }
    assert_eq!(a, b);
}

#[test]
fn convert_duplicates_keeps_one_of_each() {
    let config = EngineConfig::default_test();
    let engine = DrawEngine::new(&config);

    let mut ledger = ledger(
        0,
        vec![item("ferret"), item("ferret"), item("ferret"), item("chupacabra")],
    );
    let summary = engine.convert_duplicates(&mut ledger);

    assert_eq!(summary.total_gems, 2);
    assert_eq!(
        summary.lines,
        vec![ConvertLine {
            id: "ferret".into(),
            name: "Ferret".into(),
            rarity: Rarity::Common,
            removed: 2,
            gems: 2,
        }]
    );
    assert_eq!(ledger.gems(), 2);
    assert_eq!(ledger.inventory(), &[item("ferret"), item("chupacabra")]);

    let again = engine.convert_duplicates(&mut ledger);
    assert_eq!(again.total_gems, 0);
    assert!(again.lines.is_empty());
    assert_eq!(ledger.gems(), 2);
}
