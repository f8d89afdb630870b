//! Per-duty filters hiding duty icons in the slot grid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// A duty type that can be hidden from the grid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DutyFilter {
    Block,
    Attestation,
    Sync,
    Slash,
}

/// Which duty types are hidden. Every duty is shown unless its filter is set.
///
/// Persisted by the caller as an opaque key/value map, e.g. `{"block": true, "sync": false}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DutyFilters {
    hidden: BTreeMap<DutyFilter, bool>,
}

impl DutyFilters {
    pub fn is_hidden(&self, filter: DutyFilter) -> bool {
        self.hidden.get(&filter).copied().unwrap_or(false)
    }

    pub fn set_hidden(&mut self, filter: DutyFilter, hidden: bool) {
        self.hidden.insert(filter, hidden);
    }

    /// Flips the filter, returning the new hidden state.
    pub fn toggle(&mut self, filter: DutyFilter) -> bool {
        let hidden = !self.is_hidden(filter);
        self.set_hidden(filter, hidden);
        hidden
    }

    pub fn with_hidden(mut self, filter: DutyFilter) -> Self {
        self.set_hidden(filter, true);
        self
    }

    /// Returns every filter with its state, in a fixed order.
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        DutyFilter::iter()
            .map(|filter| (filter.as_ref().to_string(), self.is_hidden(filter)))
            .collect()
    }

    /// Restores filters from a stored map. Unknown keys are skipped.
    pub fn from_map<'a, I>(map: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let hidden = map
            .into_iter()
            .filter_map(|(key, hidden)| Some((key.parse::<DutyFilter>().ok()?, hidden)))
            .collect();
        Self { hidden }
    }
}
