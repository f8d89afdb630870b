use crate::{Epoch, Slot};
use serde::Serialize;
use std::time::Duration;

/// The EIP-155 chain id of a network.
pub type ChainId = u64;

/// The timing parameters of a beacon chain network.
///
/// Every value here is fixed for the lifetime of the chain, so instances are declared as
/// constants and handed around by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainNetwork {
    pub id: ChainId,
    pub name: &'static str,
    /// The key the network was stored under before chain ids were used.
    pub legacy_key: &'static str,
    pub genesis_timestamp_seconds: u64,
    pub slot_duration_seconds: u64,
    pub slots_per_epoch: u64,
    pub epochs_per_sync_period: u64,
    pub is_mainnet: bool,
    pub el_currency: &'static str,
    pub cl_currency: &'static str,
}

impl ChainNetwork {
    pub fn genesis_duration(&self) -> Duration {
        Duration::from_secs(self.genesis_timestamp_seconds)
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::from_secs(self.slot_duration_seconds)
    }

    pub fn slot_duration_millis(&self) -> u64 {
        self.slot_duration_seconds.saturating_mul(1000)
    }

    pub fn epoch_duration(&self) -> Duration {
        Duration::from_secs(self.slot_duration_seconds.saturating_mul(self.slots_per_epoch))
    }

    pub fn epoch_of(&self, slot: Slot) -> Epoch {
        slot.epoch(self.slots_per_epoch)
    }
}
