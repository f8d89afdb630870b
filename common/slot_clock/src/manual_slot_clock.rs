use super::SlotClock;
use crate::chain_time;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use types::{ChainNetwork, Slot};

/// Determines the present slot based upon a manually-incremented UNIX timestamp.
///
/// Clones share the same underlying time, so a test can hold one handle and move time for every
/// component that was given a clone.
#[derive(Clone, Debug)]
pub struct ManualSlotClock {
    /// Duration from UNIX epoch.
    current_time: Arc<RwLock<Duration>>,
}

impl ManualSlotClock {
    pub fn new(current_time: Duration) -> Self {
        Self {
            current_time: Arc::new(RwLock::new(current_time)),
        }
    }

    /// Creates a clock positioned at the very start of `slot` on `network`.
    pub fn at_slot(network: &ChainNetwork, slot: Slot) -> Self {
        Self::new(Duration::from_millis(chain_time::slot_to_timestamp(
            network, slot,
        )))
    }

    pub fn set_slot(&self, network: &ChainNetwork, slot: Slot) {
        self.set_current_time(Duration::from_millis(chain_time::slot_to_timestamp(
            network, slot,
        )));
    }

    pub fn set_current_time(&self, duration: Duration) {
        *self.current_time.write() = duration;
    }

    pub fn advance_time(&self, duration: Duration) {
        let mut current_time = self.current_time.write();
        *current_time = current_time.saturating_add(duration);
    }

    pub fn advance_slot(&self, network: &ChainNetwork) {
        self.advance_time(network.slot_duration())
    }
}

impl SlotClock for ManualSlotClock {
    fn now_duration(&self) -> Option<Duration> {
        Some(*self.current_time.read())
    }
}
