//! Presentation of slots as squares of the slot grid: icons, style classes and row layout.

use crate::duty::{slot_color, DutyColor};
use crate::filter::{DutyFilter, DutyFilters};
use dashboard_api::{SlotStatus, SlotVizSlot};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use strum::{AsRefStr, IntoStaticStr};
use types::Slot;

/// Base class of every square.
pub const SQUARE_CLASS: &str = "square";

/// An icon of the grid, named like the icon set the renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, IntoStaticStr)]
pub enum SlotIcon {
    /// Nothing to draw.
    #[strum(serialize = "")]
    #[serde(rename = "")]
    Nothing,
    #[strum(serialize = "cube-outline")]
    #[serde(rename = "cube-outline")]
    Proposal,
    #[strum(serialize = "document-text-outline")]
    #[serde(rename = "document-text-outline")]
    Attestation,
    #[strum(serialize = "sync-outline")]
    #[serde(rename = "sync-outline")]
    Sync,
    #[strum(serialize = "person-remove-outline")]
    #[serde(rename = "person-remove-outline")]
    Slashing,
    /// Several more duties than the big icon shows.
    #[strum(serialize = "add-outline")]
    #[serde(rename = "add-outline")]
    More,
    #[strum(serialize = "help-outline")]
    #[serde(rename = "help-outline")]
    Unknown,
}

impl SlotIcon {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Big icon priority.
const BIG_ICON_ORDER: [SlotIcon; 4] = [
    SlotIcon::Slashing,
    SlotIcon::Proposal,
    SlotIcon::Attestation,
    SlotIcon::Sync,
];

/// Order in which the remaining duties are considered for the small icon.
const SMALL_ICON_ORDER: [SlotIcon; 4] = [
    SlotIcon::Slashing,
    SlotIcon::Proposal,
    SlotIcon::Sync,
    SlotIcon::Attestation,
];

/// Returns `true` if the slot has the duty drawn by `icon` and its filter does not hide it.
fn is_visible(slot: &SlotVizSlot, filters: &DutyFilters, icon: SlotIcon) -> bool {
    let (present, filter) = match icon {
        SlotIcon::Slashing => (slot.slashing.is_some(), DutyFilter::Slash),
        SlotIcon::Proposal => (slot.proposal.is_some(), DutyFilter::Block),
        SlotIcon::Attestation => (slot.attestations.is_some(), DutyFilter::Attestation),
        SlotIcon::Sync => (slot.sync.is_some(), DutyFilter::Sync),
        SlotIcon::Nothing | SlotIcon::More | SlotIcon::Unknown => return false,
    };
    present && !filters.is_hidden(filter)
}

/// The main icon of a square: the visible duty of highest priority.
pub fn icon_big(slot: &SlotVizSlot, filters: &DutyFilters) -> SlotIcon {
    BIG_ICON_ORDER
        .into_iter()
        .find(|icon| is_visible(slot, filters, *icon))
        .unwrap_or(SlotIcon::Nothing)
}

/// The visible duties that are not shown by the big icon.
pub fn small_icon_candidates(slot: &SlotVizSlot, filters: &DutyFilters) -> Vec<SlotIcon> {
    let big = icon_big(slot, filters);
    SMALL_ICON_ORDER
        .into_iter()
        .filter(|icon| *icon != big && is_visible(slot, filters, *icon))
        .collect()
}

/// The corner icon of a square: the one remaining duty, or a plus sign for several.
pub fn icon_small(slot: &SlotVizSlot, filters: &DutyFilters) -> SlotIcon {
    match small_icon_candidates(slot, filters).as_slice() {
        [] => SlotIcon::Nothing,
        [icon] => *icon,
        _ => SlotIcon::More,
    }
}

/// The style class of a slot status. Anything not proposed or missed is styled as scheduled.
pub fn status_class(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Proposed => "network-proposed",
        SlotStatus::Missed => "network-missed",
        SlotStatus::Scheduled | SlotStatus::Orphaned => "network-scheduled",
    }
}

/// Tracks the highest slot that has received a status color.
///
/// The mark only ever increases. Clones share the same mark, so grids that should reveal slots in
/// step share one cursor; `AnimationCursor::global()` is the cursor shared by the whole process.
#[derive(Debug, Clone, Default)]
pub struct AnimationCursor {
    /// One more than the highest animated slot, zero before any slot was animated.
    mark: Arc<AtomicU64>,
}

static GLOBAL_CURSOR: LazyLock<AnimationCursor> = LazyLock::new(AnimationCursor::default);

impl AnimationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cursor.
    pub fn global() -> &'static AnimationCursor {
        &GLOBAL_CURSOR
    }

    pub fn last_animated_slot(&self) -> Option<Slot> {
        match self.mark.load(Ordering::Acquire) {
            0 => None,
            mark => Some(Slot::new(mark - 1)),
        }
    }

    /// Raises the mark to `slot`, returning `true` if it was below.
    pub fn advance(&self, slot: Slot) -> bool {
        let mark = slot.as_u64().saturating_add(1);
        self.mark.fetch_max(mark, Ordering::AcqRel) < mark
    }

    /// Returns `true` if `slot` is at or below the mark.
    pub fn is_revealed(&self, slot: Slot) -> bool {
        slot.as_u64() < self.mark.load(Ordering::Acquire)
    }
}

/// The style classes of a square: base, status and (once revealed) color.
///
/// A colored slot advances `cursor`. The color class is empty for slots above the mark.
pub fn square_css(slot: &SlotVizSlot, cursor: &AnimationCursor) -> [&'static str; 3] {
    let color = slot_color(slot);
    if !color.is_none() {
        cursor.advance(slot.slot);
    }

    let color_class = if cursor.is_revealed(slot.slot) {
        color.as_str()
    } else {
        DutyColor::None.as_str()
    };

    [SQUARE_CLASS, status_class(slot.status), color_class]
}

/// Everything a renderer needs to draw one square of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPresentation {
    pub slot: Slot,
    pub big_icon: SlotIcon,
    pub small_icon: SlotIcon,
    pub square_css: [&'static str; 3],
    /// The combined slot color. Filters never change it.
    pub color: DutyColor,
    /// `true` if this slot raised the animation mark, i.e. its color is shown for the first time.
    pub newly_revealed: bool,
}

pub fn present(
    slot: &SlotVizSlot,
    filters: &DutyFilters,
    cursor: &AnimationCursor,
) -> SlotPresentation {
    let color = slot_color(slot);
    let newly_revealed = !color.is_none() && !cursor.is_revealed(slot.slot);

    SlotPresentation {
        slot: slot.slot,
        big_icon: icon_big(slot, filters),
        small_icon: icon_small(slot, filters),
        square_css: square_css(slot, cursor),
        color,
        newly_revealed,
    }
}

/// Splits slots (sorted ascending) into rows of `slots_per_row` and keeps the newest
/// `rows_to_show` rows. The newest row comes last.
pub fn paginate_rows(
    slots: &[SlotVizSlot],
    slots_per_row: usize,
    rows_to_show: usize,
) -> Vec<&[SlotVizSlot]> {
    if slots_per_row == 0 {
        return vec![];
    }

    let rows = slots.chunks(slots_per_row).collect::<Vec<_>>();
    let skip = rows.len().saturating_sub(rows_to_show);
    rows.into_iter().skip(skip).collect()
}

/// Presents the paginated rows of `slots`.
pub fn present_rows(
    slots: &[SlotVizSlot],
    filters: &DutyFilters,
    cursor: &AnimationCursor,
    slots_per_row: usize,
    rows_to_show: usize,
) -> Vec<Vec<SlotPresentation>> {
    paginate_rows(slots, slots_per_row, rows_to_show)
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|slot| present(slot, filters, cursor))
                .collect()
        })
        .collect()
}
