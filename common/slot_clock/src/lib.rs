pub mod chain_time;
mod manual_slot_clock;
mod metrics;
mod system_time_slot_clock;

use std::time::Duration;

pub use crate::chain_time::{
    epoch_to_timestamp, slot_to_seconds_timestamp, slot_to_timestamp, sync_committee_period,
    sync_committee_period_end_epoch, sync_committee_period_start_epoch, time_until_next_slot,
    timestamp_to_epoch, timestamp_to_slot,
};
pub use crate::manual_slot_clock::ManualSlotClock;
pub use crate::manual_slot_clock::ManualSlotClock as TestingSlotClock;
pub use crate::system_time_slot_clock::SystemTimeSlotClock;
pub use crate::metrics::scrape_for_metrics;
pub use types::{ChainNetwork, Epoch, Slot};

/// A clock that reports the current slot of any chain network.
///
/// Unlike a clock bound to a single genesis, the network is supplied on every call: the active
/// network of a dashboard can change while the clock is in use.
///
/// The clock is not required to be monotonically increasing and may go backwards.
pub trait SlotClock: Send + Sync + Clone {
    /// Returns the present time as a duration since the UNIX epoch.
    ///
    /// Returns `None` if the present time is before the UNIX epoch (unlikely).
    fn now_duration(&self) -> Option<Duration>;

    /// Returns the present time in milliseconds since the UNIX epoch.
    fn now_millis(&self) -> Option<u64> {
        self.now_duration()
            .map(|now| u64::try_from(now.as_millis()).unwrap_or(u64::MAX))
    }

    /// Returns the slot of `network` at this present time.
    fn now(&self, network: &ChainNetwork) -> Option<Slot> {
        self.now_millis()
            .map(|now| chain_time::timestamp_to_slot(network, now))
    }

    /// Returns the epoch of `network` at this present time.
    fn now_epoch(&self, network: &ChainNetwork) -> Option<Epoch> {
        self.now_millis()
            .map(|now| chain_time::timestamp_to_epoch(network, now))
    }

    /// Indicates if the current time is prior to the genesis of `network`.
    fn is_prior_to_genesis(&self, network: &ChainNetwork) -> Option<bool> {
        Some(self.now_duration()? < network.genesis_duration())
    }

    /// Returns the duration until the next slot of `network`.
    fn duration_to_next_slot(&self, network: &ChainNetwork) -> Option<Duration> {
        self.now_millis()
            .map(|now| Duration::from_millis(chain_time::time_until_next_slot(network, now)))
    }

    /// Returns the start time of `slot`, as a duration since `UNIX_EPOCH`.
    fn start_of(&self, network: &ChainNetwork, slot: Slot) -> Duration {
        Duration::from_millis(chain_time::slot_to_timestamp(network, slot))
    }

    /// Returns the duration from now until `slot`, or `None` if `slot` has already started.
    fn duration_to_slot(&self, network: &ChainNetwork, slot: Slot) -> Option<Duration> {
        self.start_of(network, slot).checked_sub(self.now_duration()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use network_registry::{ETHEREUM, GNOSIS};

    #[test]
    fn trait_methods_follow_chain_time() {
        let clock = ManualSlotClock::new(ETHEREUM.genesis_duration() + Duration::from_secs(38));

        assert_eq!(clock.now(&ETHEREUM), Some(Slot::new(3)));
        assert_eq!(clock.now_epoch(&ETHEREUM), Some(Epoch::new(0)));
        assert_eq!(
            clock.duration_to_next_slot(&ETHEREUM),
            Some(Duration::from_secs(10))
        );
        assert_eq!(clock.is_prior_to_genesis(&ETHEREUM), Some(false));
        assert_eq!(
            clock.duration_to_slot(&ETHEREUM, Slot::new(5)),
            Some(Duration::from_secs(22))
        );
        assert_eq!(clock.duration_to_slot(&ETHEREUM, Slot::new(3)), None);
    }

    #[test]
    fn same_instant_on_different_networks() {
        // Gnosis genesis is later than mainnet's and its slots are shorter.
        let clock = ManualSlotClock::new(GNOSIS.genesis_duration() + Duration::from_secs(12));

        assert_eq!(clock.now(&GNOSIS), Some(Slot::new(2)));
        assert_eq!(
            clock.duration_to_next_slot(&GNOSIS),
            Some(Duration::from_secs(3))
        );
        assert!(clock.now(&ETHEREUM).unwrap() > Slot::new(2));
    }

    #[test]
    fn before_genesis() {
        let clock = ManualSlotClock::new(ETHEREUM.genesis_duration() - Duration::from_secs(1));
        assert_eq!(clock.is_prior_to_genesis(&ETHEREUM), Some(true));
        assert_eq!(clock.now(&ETHEREUM), Some(Slot::new(0)));
    }
}
