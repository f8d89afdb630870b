use crate::SlotClock;
pub use metrics::*;
use std::sync::LazyLock;
use types::ChainNetwork;

pub static PRESENT_SLOT: LazyLock<Result<IntGauge>> =
    LazyLock::new(|| try_create_int_gauge("slotclock_present_slot", "The present wall-clock slot"));
pub static PRESENT_EPOCH: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge("slotclock_present_epoch", "The present wall-clock epoch")
});
pub static SLOTS_PER_EPOCH: LazyLock<Result<IntGauge>> =
    LazyLock::new(|| try_create_int_gauge("slotclock_slots_per_epoch", "Slots per epoch (constant)"));
pub static SECONDS_PER_SLOT: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge(
        "slotclock_slot_time_seconds",
        "The duration in seconds between each slot",
    )
});
pub static CHAIN_ID: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge(
        "slotclock_chain_id",
        "The chain id of the network the clock was last scraped for",
    )
});

/// Update the global metrics `DEFAULT_REGISTRY` with info from the slot clock.
pub fn scrape_for_metrics<U: SlotClock>(clock: &U, network: &ChainNetwork) {
    let present_slot = clock.now(network).unwrap_or_default();
    let present_epoch = clock.now_epoch(network).unwrap_or_default();

    set_gauge(&PRESENT_SLOT, present_slot.as_u64() as i64);
    set_gauge(&PRESENT_EPOCH, present_epoch.as_u64() as i64);
    set_gauge(&SLOTS_PER_EPOCH, network.slots_per_epoch as i64);
    set_gauge(&SECONDS_PER_SLOT, network.slot_duration_seconds as i64);
    set_gauge(&CHAIN_ID, network.id as i64);
}
