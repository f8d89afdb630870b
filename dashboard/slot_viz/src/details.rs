//! Everything a slot detail popup shows about one slot.

use crate::duty::{
    attestation_color, proposal_color, slashing_color, slot_color, sync_color, DutyColor,
};
use dashboard_api::{SlotStatus, SlotVizSlot};
use serde::Serialize;
use slot_clock::slot_to_timestamp;
use types::{ChainNetwork, Slot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotDetails {
    pub slot: Slot,
    pub status: SlotStatus,
    /// Start of the slot, in milliseconds since the UNIX epoch.
    pub timestamp: u64,
    pub proposal: DutyColor,
    pub attestations: DutyColor,
    pub sync: DutyColor,
    pub slashing: DutyColor,
    pub color: DutyColor,
}

impl SlotDetails {
    pub fn new(network: &ChainNetwork, slot: &SlotVizSlot) -> Self {
        Self {
            slot: slot.slot,
            status: slot.status,
            timestamp: slot_to_timestamp(network, slot.slot),
            proposal: proposal_color(slot),
            attestations: attestation_color(slot),
            sync: sync_color(slot),
            slashing: slashing_color(slot),
            color: slot_color(slot),
        }
    }

    /// Link to the slot on the block explorer at `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/slot/{}", base_url.trim_end_matches('/'), self.slot)
    }
}
