//! Time source for the engine.
//!
//! RULE: Nothing in the engine reads the platform clock directly.
//! Accrual and reminder planning take `now` from a `Clock`, so tests
//! drive time by hand through `ManualClock`.

use crate::types::EpochMs;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

pub trait Clock: Send {
    /// Current wall-clock instant in epoch milliseconds.
    fn now_ms(&self) -> EpochMs;
}

/// Real time, via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMs {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Settable clock. Clones share the same instant, so a test can keep one
/// handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_ms: EpochMs) -> Self {
        Self { now: Arc::new(AtomicI64::new(start_ms)) }
    }

    pub fn set(&self, ms: EpochMs) {
        self.now.store(ms, Ordering::SeqCst);
    }

    /// Move forward by `delta_ms`. Returns the new instant.
    pub fn advance(&self, delta_ms: EpochMs) -> EpochMs {
        self.now.fetch_add(delta_ms, Ordering::SeqCst) + delta_ms
    }

    pub fn advance_minutes(&self, minutes: i64) -> EpochMs {
        self.advance(minutes * crate::types::MS_PER_MINUTE)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> EpochMs {
        self.now.load(Ordering::SeqCst)
    }
}
