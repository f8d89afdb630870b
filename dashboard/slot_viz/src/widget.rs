//! The compact previous/next duty summary shown outside the grid.

use crate::duty::slot_color;
use crate::grid::SlotIcon;
use crate::provider::SlotVizView;
use dashboard_api::SlotVizSlot;
use serde::Serialize;

/// Color class shown for a previous duty without any classified outcome.
pub const UNKNOWN_COLOR: &str = "unknown";

/// The icon of the most prominent anticipated duty of `slot`.
pub fn duty_icon(slot: Option<&SlotVizSlot>) -> SlotIcon {
    match slot {
        Some(slot) if slot.proposal.is_some() => SlotIcon::Proposal,
        Some(slot) if slot.sync.is_some() => SlotIcon::Sync,
        Some(slot) if slot.attestations.is_some() => SlotIcon::Attestation,
        _ => SlotIcon::Unknown,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetState {
    pub previous_icon: SlotIcon,
    pub previous_color: &'static str,
    pub next_icon: SlotIcon,
    /// Start (ms) of the next duty slot.
    pub next_duty_timestamp: Option<u64>,
}

impl WidgetState {
    pub fn from_view(view: &SlotVizView) -> Self {
        let previous = view.previous_duty();
        let previous_color = previous
            .map(slot_color)
            .filter(|color| !color.is_none())
            .map_or(UNKNOWN_COLOR, |color| color.as_str());

        Self {
            previous_icon: duty_icon(previous),
            previous_color,
            next_icon: duty_icon(view.next_duty()),
            next_duty_timestamp: view.next_duty_timestamp,
        }
    }

    /// Returns `true` if the next duty differs from the one in `other`, e.g. to restart a
    /// countdown.
    pub fn next_duty_changed(&self, other: &WidgetState) -> bool {
        self.next_icon != other.next_icon || self.next_duty_timestamp != other.next_duty_timestamp
    }
}
