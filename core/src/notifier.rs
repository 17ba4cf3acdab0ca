//! Local notification scheduler seam.
//!
//! The engine only ever asks a `Notifier` to schedule or cancel. Delivery
//! is best effort; a failed call is logged by the caller and dropped.

use crate::{
    error::{PetError, PetResult},
    types::{EpochMs, TriggerHandle},
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Notifier: Send {
    /// Register one notification and return its handle.
    fn schedule(&mut self, trigger_at: EpochMs, title: &str, body: &str) -> PetResult<TriggerHandle>;

    fn cancel(&mut self, handle: &str) -> PetResult<()>;

    /// Cancel every handle, continuing past individual failures.
    /// Returns the number of failed cancellations.
    fn cancel_all(&mut self, handles: &[TriggerHandle]) -> usize {
        let mut failed = 0;
        for handle in handles {
            if let Err(e) = self.cancel(handle) {
                log::warn!("notifier: cancel {handle} failed: {e}");
                failed += 1;
            }
        }
        failed
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScheduledNotification {
    pub handle:     TriggerHandle,
    pub trigger_at: EpochMs,
    pub title:      String,
    pub body:       String,
}

#[derive(Debug, Default)]
struct MemoryNotifierState {
    pending:   Vec<ScheduledNotification>,
    cancelled: Vec<TriggerHandle>,
    offline:   bool,
}

/// In-process notifier. Clones share one queue, so a test can inspect
/// what the engine scheduled. Used by the runner as well.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    state: Arc<Mutex<MemoryNotifierState>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryNotifierState> {
        // A poisoned queue is still usable for bookkeeping.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// While offline every schedule/cancel call fails.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn pending(&self) -> Vec<ScheduledNotification> {
        self.lock().pending.clone()
    }

    pub fn cancelled(&self) -> Vec<TriggerHandle> {
        self.lock().cancelled.clone()
    }
}

impl Notifier for MemoryNotifier {
    fn schedule(&mut self, trigger_at: EpochMs, title: &str, body: &str) -> PetResult<TriggerHandle> {
        let mut state = self.lock();
        if state.offline {
            return Err(PetError::Notifier("notifier offline".into()));
        }
        let handle = uuid::Uuid::new_v4().to_string();
        state.pending.push(ScheduledNotification {
            handle: handle.clone(),
            trigger_at,
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(handle)
    }

    fn cancel(&mut self, handle: &str) -> PetResult<()> {
        let mut state = self.lock();
        if state.offline {
            return Err(PetError::Notifier("notifier offline".into()));
        }
        state.pending.retain(|n| n.handle != handle);
        state.cancelled.push(handle.to_string());
        Ok(())
    }
}
