use super::SlotClock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Determines the present slot based upon the present system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSlotClock;

impl SystemTimeSlotClock {
    pub fn new() -> Self {
        Self
    }
}

impl SlotClock for SystemTimeSlotClock {
    fn now_duration(&self) -> Option<Duration> {
        SystemTime::now().duration_since(UNIX_EPOCH).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_registry::ETHEREUM;

    #[test]
    fn reads_the_system_time() {
        let clock = SystemTimeSlotClock::new();

        assert!(clock.now_duration().is_some());
        assert_eq!(clock.is_prior_to_genesis(&ETHEREUM), Some(false));

        let until_next = clock.duration_to_next_slot(&ETHEREUM).unwrap();
        assert!(until_next > Duration::ZERO);
        assert!(until_next <= ETHEREUM.slot_duration());
    }
}
