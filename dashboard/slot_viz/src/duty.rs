//! Classification of the duties in a slot into display colors.

use dashboard_api::{SlotStatus, SlotVizSlot, SlotVizStatus, TotalCount};
use serde::Serialize;
use strum::{AsRefStr, IntoStaticStr};

/// The display state of a duty, or of a whole slot.
///
/// The string form is the style class a renderer applies; `None` renders as the empty string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DutyColor {
    #[default]
    #[strum(serialize = "")]
    #[serde(rename = "")]
    None,
    Success,
    Warning,
    Danger,
}

impl DutyColor {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn is_none(self) -> bool {
        self == DutyColor::None
    }
}

/// Mixed outcomes warn, any failure alone is dangerous, success alone is success.
fn failed_first<T: TotalCount>(status: &SlotVizStatus<T>) -> DutyColor {
    let success = status.success_count();
    let failed = status.failed_count();

    if failed > 0 && success > 0 {
        DutyColor::Warning
    } else if failed > 0 {
        DutyColor::Danger
    } else if success > 0 {
        DutyColor::Success
    } else {
        DutyColor::None
    }
}

pub fn attestation_color(slot: &SlotVizSlot) -> DutyColor {
    slot.attestations
        .as_ref()
        .map_or(DutyColor::None, failed_first)
}

pub fn sync_color(slot: &SlotVizSlot) -> DutyColor {
    slot.sync.as_ref().map_or(DutyColor::None, failed_first)
}

/// Success is checked before failure here, unlike the other duties: a slot where our validators
/// both slashed and got slashed shows success.
pub fn slashing_color(slot: &SlotVizSlot) -> DutyColor {
    let Some(slashing) = slot.slashing.as_ref() else {
        return DutyColor::None;
    };

    if slashing.success_count() > 0 {
        DutyColor::Success
    } else if slashing.failed_count() > 0 {
        DutyColor::Danger
    } else {
        DutyColor::None
    }
}

pub fn proposal_color(slot: &SlotVizSlot) -> DutyColor {
    if slot.proposal.is_none() {
        return DutyColor::None;
    }

    match slot.status {
        SlotStatus::Missed | SlotStatus::Orphaned => DutyColor::Danger,
        SlotStatus::Proposed => DutyColor::Success,
        SlotStatus::Scheduled => DutyColor::None,
    }
}

/// Combines the colors of all duties in the slot.
///
/// Danger or success only when every classified duty agrees, warning for any mix.
pub fn slot_color(slot: &SlotVizSlot) -> DutyColor {
    let colors = [
        attestation_color(slot),
        proposal_color(slot),
        sync_color(slot),
        slashing_color(slot),
    ];
    let mut classified = colors.into_iter().filter(|color| !color.is_none());

    let Some(first) = classified.next() else {
        return DutyColor::None;
    };

    match first {
        DutyColor::Danger | DutyColor::Success if classified.all(|color| color == first) => first,
        _ => DutyColor::Warning,
    }
}

/// Returns `true` if the slot holds a duty the dashboard navigates between.
///
/// Slashings have a color but are not anticipated like the other duties, so they do not count.
pub fn slot_has_duty(slot: &SlotVizSlot) -> bool {
    slot.attestations.is_some() || slot.proposal.is_some() || slot.sync.is_some()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dashboard_api::{SlotVizDuty, SlotVizSlashing, SlotVizTuple};
    use types::Slot;

    pub fn duty(success: u64, failed: u64) -> SlotVizStatus<SlotVizDuty> {
        SlotVizStatus {
            success: Some(SlotVizDuty {
                total_count: success,
                validators: vec![],
            }),
            failed: Some(SlotVizDuty {
                total_count: failed,
                validators: vec![],
            }),
            scheduled: None,
        }
    }

    pub fn slashing(success: u64, failed: u64) -> SlotVizStatus<SlotVizSlashing> {
        SlotVizStatus {
            success: Some(SlotVizSlashing {
                total_count: success,
                slashings: vec![],
            }),
            failed: Some(SlotVizSlashing {
                total_count: failed,
                slashings: vec![],
            }),
            scheduled: None,
        }
    }

    pub fn proposal() -> SlotVizTuple {
        SlotVizTuple {
            validator: 1,
            duty_object: 123,
        }
    }

    fn slot(status: SlotStatus) -> SlotVizSlot {
        SlotVizSlot::empty(Slot::new(1), status)
    }

    #[test]
    fn attestation_rules() {
        let mut s = slot(SlotStatus::Scheduled);
        assert_eq!(attestation_color(&s), DutyColor::None);

        s.attestations = Some(duty(5, 3));
        assert_eq!(attestation_color(&s), DutyColor::Warning);
        s.attestations = Some(duty(0, 3));
        assert_eq!(attestation_color(&s), DutyColor::Danger);
        s.attestations = Some(duty(5, 0));
        assert_eq!(attestation_color(&s), DutyColor::Success);
        s.attestations = Some(duty(0, 0));
        assert_eq!(attestation_color(&s), DutyColor::None);

        // Only scheduled validators.
        s.attestations = Some(SlotVizStatus {
            scheduled: Some(SlotVizDuty {
                total_count: 2,
                validators: vec![1, 2],
            }),
            ..SlotVizStatus::default()
        });
        assert_eq!(attestation_color(&s), DutyColor::None);
    }

    #[test]
    fn sync_rules() {
        let mut s = slot(SlotStatus::Scheduled);
        s.sync = Some(duty(0, 2));
        assert_eq!(sync_color(&s), DutyColor::Danger);
        s.sync = Some(duty(1, 2));
        assert_eq!(sync_color(&s), DutyColor::Warning);
        s.sync = Some(duty(2, 0));
        assert_eq!(sync_color(&s), DutyColor::Success);
    }

    #[test]
    fn slashing_checks_success_first() {
        let mut s = slot(SlotStatus::Scheduled);
        s.slashing = Some(slashing(1, 1));
        assert_eq!(slashing_color(&s), DutyColor::Success);
        s.slashing = Some(slashing(0, 5));
        assert_eq!(slashing_color(&s), DutyColor::Danger);
        s.slashing = Some(slashing(0, 0));
        assert_eq!(slashing_color(&s), DutyColor::None);
    }

    #[test]
    fn proposal_rules() {
        for (status, expected) in [
            (SlotStatus::Missed, DutyColor::Danger),
            (SlotStatus::Orphaned, DutyColor::Danger),
            (SlotStatus::Proposed, DutyColor::Success),
            (SlotStatus::Scheduled, DutyColor::None),
        ] {
            let mut s = slot(status);
            assert_eq!(proposal_color(&s), DutyColor::None);
            s.proposal = Some(proposal());
            assert_eq!(proposal_color(&s), expected, "{:?}", status);
        }
    }

    #[test]
    fn combined_color() {
        let mut s = slot(SlotStatus::Proposed);
        assert_eq!(slot_color(&s), DutyColor::None);

        s.proposal = Some(proposal());
        s.attestations = Some(duty(3, 0));
        assert_eq!(slot_color(&s), DutyColor::Success);

        s.sync = Some(duty(0, 2));
        assert_eq!(slot_color(&s), DutyColor::Warning);

        let mut s = slot(SlotStatus::Missed);
        s.proposal = Some(proposal());
        s.sync = Some(duty(0, 1));
        assert_eq!(slot_color(&s), DutyColor::Danger);

        let mut s = slot(SlotStatus::Scheduled);
        s.sync = Some(duty(0, 1));
        s.attestations = Some(duty(4, 0));
        assert_eq!(sync_color(&s), DutyColor::Danger);
        assert_eq!(attestation_color(&s), DutyColor::Success);
        assert_eq!(slot_color(&s), DutyColor::Warning);

        // A single warning stays a warning.
        let mut s = slot(SlotStatus::Scheduled);
        s.attestations = Some(duty(1, 1));
        assert_eq!(slot_color(&s), DutyColor::Warning);
    }

    #[test]
    fn slashing_alone_is_not_a_duty() {
        let mut s = slot(SlotStatus::Scheduled);
        assert!(!slot_has_duty(&s));
        s.slashing = Some(slashing(1, 0));
        assert!(!slot_has_duty(&s));
        s.sync = Some(duty(1, 0));
        assert!(slot_has_duty(&s));
    }

    #[test]
    fn color_strings() {
        assert_eq!(DutyColor::None.as_str(), "");
        assert_eq!(DutyColor::Success.as_str(), "success");
        assert_eq!(DutyColor::Danger.as_ref(), "danger");
    }
}
