//! The slot visualization types served by the dashboard API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, EnumString};
pub use types::{ChainId, Epoch, Slot};

/// Identifies a validator group within a dashboard.
pub type GroupId = i64;

/// The group id selecting every group of a dashboard.
pub const ALL_GROUPS: GroupId = -1;

/// An API error serializable to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: u16,
    pub message: String,
}

/// The `{"data": ...}` envelope wrapped around every API response.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + serde::de::DeserializeOwned")]
pub struct ApiDataResponse<T: Serialize + serde::de::DeserializeOwned> {
    pub data: T,
}

impl<T: Serialize + serde::de::DeserializeOwned> From<T> for ApiDataResponse<T> {
    fn from(data: T) -> Self {
        Self { data }
    }
}

/// A dashboard is either owned by an account (numeric id) or shared through a public id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DashboardId {
    Private(u64),
    Public(String),
}

impl FromStr for DashboardId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("Dashboard id must not be empty".to_string());
        }
        Ok(s.parse::<u64>()
            .map(DashboardId::Private)
            .unwrap_or_else(|_| DashboardId::Public(s.to_string())))
    }
}

impl fmt::Display for DashboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardId::Private(id) => write!(f, "{}", id),
            DashboardId::Public(id) => write!(f, "{}", id),
        }
    }
}

/// Outcome of the block slot itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlotStatus {
    Scheduled,
    Proposed,
    Missed,
    Orphaned,
}

/// Fork choice state of an epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EpochState {
    Scheduled,
    Head,
    Justifying,
    Justified,
    Finalized,
}

/// Validators performing a duty. At most a handful of indices are listed, `total_count` is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotVizDuty {
    pub total_count: u64,
    #[serde(default)]
    pub validators: Vec<u64>,
}

/// A validator paired with the object of its duty.
///
/// For a proposal the object is the proposed block, or the slot while it is scheduled or failed.
/// For a slashing it is the slashed validator, or the slashing validator if ours was slashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotVizTuple {
    pub validator: u64,
    pub duty_object: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotVizSlashing {
    pub total_count: u64,
    #[serde(default)]
    pub slashings: Vec<SlotVizTuple>,
}

/// Anything that reports how many validators it covers.
pub trait TotalCount {
    fn total_count(&self) -> u64;
}

impl TotalCount for SlotVizDuty {
    fn total_count(&self) -> u64 {
        self.total_count
    }
}

impl TotalCount for SlotVizSlashing {
    fn total_count(&self) -> u64 {
        self.total_count
    }
}

/// A duty split by outcome. Absent parts mean nobody had that outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotVizStatus<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<T>,
}

impl<T> Default for SlotVizStatus<T> {
    fn default() -> Self {
        Self {
            success: None,
            failed: None,
            scheduled: None,
        }
    }
}

impl<T: TotalCount> SlotVizStatus<T> {
    pub fn success_count(&self) -> u64 {
        self.success.as_ref().map_or(0, TotalCount::total_count)
    }

    pub fn failed_count(&self) -> u64 {
        self.failed.as_ref().map_or(0, TotalCount::total_count)
    }

    pub fn scheduled_count(&self) -> u64 {
        self.scheduled.as_ref().map_or(0, TotalCount::total_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotVizSlot {
    pub slot: Slot,
    pub status: SlotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<SlotVizTuple>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestations: Option<SlotVizStatus<SlotVizDuty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SlotVizStatus<SlotVizDuty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slashing: Option<SlotVizStatus<SlotVizSlashing>>,
}

impl SlotVizSlot {
    /// A slot without any duty of the dashboard's validators.
    pub fn empty(slot: Slot, status: SlotStatus) -> Self {
        Self {
            slot,
            status,
            proposal: None,
            attestations: None,
            sync: None,
            slashing: None,
        }
    }
}

/// An epoch of the slot visualization.
///
/// `state` and `progress` are only filled on the landing page, `slots` only for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotVizEpoch {
    pub epoch: Epoch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<EpochState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<SlotVizSlot>>,
}
