//! Collection ledger: currency and pet care.

use taskpet_core::{
    catalog::{Catalog, Item},
    config::EconomyConfig,
    ledger::{FeedOutcome, Ledger, Pet},
};

fn item(id: &str) -> Item {
    Catalog::builtin().get(id).cloned().expect("catalog item")
}

fn ledger_with(gems: u64, happiness: u8, inventory: Vec<Item>) -> Ledger {
    let mut pet = Pet::from_defaults(&EconomyConfig::default().pet_defaults);
    pet.happiness = happiness;
    Ledger::from_parts(gems, inventory, pet)
}

#[test]
fn debit_refuses_overdraft() {
    let mut ledger = ledger_with(5, 50, Vec::new());
    assert!(!ledger.debit(6));
    assert_eq!(ledger.gems(), 5);
    assert!(ledger.debit(5));
    assert_eq!(ledger.gems(), 0);
    assert!(!ledger.debit(1));
    assert_eq!(ledger.gems(), 0);
}

#[test]
fn feeding_to_full_rolls_over_into_next_level() {
    let mut ledger = ledger_with(0, 90, Vec::new());
    let outcome = ledger.feed(15, 20).expect("pet is home");
    assert_eq!(outcome, FeedOutcome { happiness: 20, level: 2, leveled_up: true });
    assert_eq!(ledger.pet().happiness, 20);
    assert_eq!(ledger.pet().level, 2);
}

#[test]
fn feeding_short_of_full_just_adds() {
    let mut ledger = ledger_with(0, 80, Vec::new());
    let outcome = ledger.feed(10, 20).expect("pet is home");
    assert_eq!(outcome, FeedOutcome { happiness: 90, level: 1, leveled_up: false });
}

#[test]
fn estranged_pet_cannot_be_fed() {
    let mut ledger = ledger_with(0, 3, Vec::new());
    assert!(ledger.apply_mood_penalty(3, 42));
    assert!(ledger.pet().is_estranged());
    assert!(ledger.feed(10, 20).is_none());
    assert_eq!(ledger.pet().happiness, 0);
}

#[test]
fn reconcile_needs_gems_and_restores_pet() {
    let mut ledger = ledger_with(49, 1, Vec::new());
    ledger.apply_mood_penalty(10, 1_000);
    assert_eq!(ledger.pet().left_at, Some(1_000));

    assert!(!ledger.reconcile(50, 50));
    assert_eq!(ledger.gems(), 49);
    assert!(ledger.pet().is_estranged());

    ledger.credit(1);
    assert!(ledger.reconcile(50, 50));
    assert_eq!(ledger.gems(), 0);
    assert_eq!(ledger.pet().happiness, 50);
    assert_eq!(ledger.pet().left_at, None);
}

#[test]
fn rename_trims_and_ignores_blank() {
    let mut ledger = ledger_with(0, 50, Vec::new());
    assert!(ledger.rename("  Biscuit  "));
    assert_eq!(ledger.pet().name, "Biscuit");
    assert!(!ledger.rename("   "));
    assert_eq!(ledger.pet().name, "Biscuit");
}

#[test]
fn active_creature_must_be_owned() {
    let mut ledger = ledger_with(0, 50, vec![item("ferret"), item("nessie"), item("halo")]);
    assert!(ledger.set_active_creature("nessie"));
    assert_eq!(ledger.pet().species, "Nessie");
    assert!(!ledger.set_active_creature("panda"));
    assert!(!ledger.set_active_creature("halo"), "accessories are not creatures");
    assert_eq!(ledger.pet().species, "Nessie");
}

#[test]
fn starter_is_seeded_only_without_a_creature() {
    let mut ledger = ledger_with(0, 50, vec![item("halo")]);
    assert!(ledger.ensure_starter(&item("ferret")));
    assert_eq!(ledger.inventory()[0], item("ferret"));
    assert!(!ledger.ensure_starter(&item("ferret")));
    assert_eq!(ledger.inventory().len(), 2);
}

#[test]
fn restored_state_is_repaired() {
    let mut pet = Pet::from_defaults(&EconomyConfig::default().pet_defaults);
    pet.happiness = 250;
    pet.level = 0;
    pet.equipped_accessories = vec!["crown".into(), "halo".into()];

    let ledger = Ledger::from_parts(3, vec![item("halo")], pet);
    assert_eq!(ledger.pet().happiness, 100);
    assert_eq!(ledger.pet().level, 1);
    assert_eq!(ledger.pet().equipped_accessories, vec!["halo".to_string()]);
}

#[test]
fn oversized_feed_saturates_into_a_level_up() {
    let mut ledger = ledger_with(0, 50, Vec::new());
    let outcome = ledger.feed(u32::MAX, 20).expect("pet is home");
    assert_eq!(outcome, FeedOutcome { happiness: 20, level: 2, leveled_up: true });
}

#[test]
fn species_moves_to_an_owned_creature() {
    let mut pet = Pet::from_defaults(&EconomyConfig::default().pet_defaults);
    pet.species = "Raccoon".into();
    let ledger = Ledger::from_parts(0, vec![item("halo"), item("nessie")], pet);
    assert_eq!(ledger.pet().species, "Nessie", "raccoon is not held");

    let mut ledger = ledger_with(0, 50, vec![item("raccoon")]);
    assert!(ledger.set_active_creature("raccoon"));
    ledger.clear_inventory();
    assert!(ledger.ensure_starter(&item("ferret")));
    assert_eq!(ledger.pet().species, "Ferret");
}
