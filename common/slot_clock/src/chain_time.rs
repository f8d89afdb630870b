//! Conversions between wall-clock timestamps, slots and epochs of a `ChainNetwork`.
//!
//! Timestamps are milliseconds since the UNIX epoch unless the name says seconds. Instants before
//! genesis saturate to slot (or epoch) zero, so every function is total.

use types::{ChainNetwork, Epoch, Slot};

fn genesis_millis(network: &ChainNetwork) -> u64 {
    network.genesis_timestamp_seconds.saturating_mul(1000)
}

fn epoch_duration_millis(network: &ChainNetwork) -> u64 {
    network
        .slot_duration_millis()
        .saturating_mul(network.slots_per_epoch)
}

/// Returns the start of `epoch` in milliseconds.
pub fn epoch_to_timestamp(network: &ChainNetwork, epoch: Epoch) -> u64 {
    let since_genesis = epoch
        .as_u64()
        .saturating_mul(epoch_duration_millis(network));
    genesis_millis(network).saturating_add(since_genesis)
}

/// Returns the epoch containing the instant `timestamp` (milliseconds).
pub fn timestamp_to_epoch(network: &ChainNetwork, timestamp: u64) -> Epoch {
    let since_genesis = timestamp.saturating_sub(genesis_millis(network));
    Epoch::new(since_genesis / epoch_duration_millis(network).max(1))
}

/// Returns the start of `slot` in seconds.
pub fn slot_to_seconds_timestamp(network: &ChainNetwork, slot: Slot) -> u64 {
    network
        .genesis_timestamp_seconds
        .saturating_add(slot.as_u64().saturating_mul(network.slot_duration_seconds))
}

/// Returns the start of `slot` in milliseconds.
pub fn slot_to_timestamp(network: &ChainNetwork, slot: Slot) -> u64 {
    slot_to_seconds_timestamp(network, slot).saturating_mul(1000)
}

/// Returns the slot containing the instant `timestamp` (milliseconds).
pub fn timestamp_to_slot(network: &ChainNetwork, timestamp: u64) -> Slot {
    let since_genesis = timestamp.saturating_sub(genesis_millis(network));
    Slot::new(since_genesis / network.slot_duration_millis().max(1))
}

/// Returns the milliseconds from `now` until the start of the next slot.
///
/// Exactly on a slot boundary this is a full slot duration, never zero.
pub fn time_until_next_slot(network: &ChainNetwork, now: u64) -> u64 {
    let slot_duration = network.slot_duration_millis().max(1);
    let since_genesis = now.saturating_sub(genesis_millis(network));
    slot_duration - since_genesis % slot_duration
}

/// Returns the index of the sync committee period containing `slot`.
pub fn sync_committee_period(network: &ChainNetwork, slot: Slot) -> u64 {
    network.epoch_of(slot).as_u64() / network.epochs_per_sync_period.max(1)
}

/// Returns the first epoch of the sync committee period containing `slot`.
pub fn sync_committee_period_start_epoch(network: &ChainNetwork, slot: Slot) -> Epoch {
    Epoch::new(
        sync_committee_period(network, slot).saturating_mul(network.epochs_per_sync_period),
    )
}

/// Returns the first epoch after the sync committee period containing `slot` (exclusive end).
pub fn sync_committee_period_end_epoch(network: &ChainNetwork, slot: Slot) -> Epoch {
    sync_committee_period_start_epoch(network, slot) + network.epochs_per_sync_period
}
