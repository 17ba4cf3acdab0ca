//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness flows through DrawRng instances derived from a
//! single master seed. Each slot gets its own stream, seeded from
//! (master_seed XOR slot_index * golden-ratio constant), so adding a
//! slot never changes the streams of existing ones.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct DrawRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl DrawRng {
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a float in [0.0, 100.0).
    pub fn next_percent(&mut self) -> f64 {
        self.next_f64() * 100.0
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }
}

/// Hands out RNG streams for one engine instance.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_slot(&self, slot: RngSlot) -> DrawRng {
        DrawRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries. Append only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    Gacha = 0,
}

impl RngSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gacha => "gacha",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngBank::new(7).for_slot(RngSlot::Gacha);
        let mut b = RngBank::new(7).for_slot(RngSlot::Gacha);
        for _ in 0..32 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn percent_rolls_stay_in_range() {
        let mut rng = RngBank::new(0xABCD).for_slot(RngSlot::Gacha);
        for _ in 0..10_000 {
            let p = rng.next_percent();
            assert!((0.0..100.0).contains(&p), "out of range: {p}");
        }
    }
}
