//! This crate provides two things:
//!
//! 1. The slot visualization types served by the validator dashboard API.
//! 2. The `SlotVizApi` trait through which the slot visualization engine talks to that API, plus
//!    an implementation replaying a recorded response from disk.

mod file;
pub mod types;

pub use crate::file::FileSlotVizApi;
pub use crate::types::*;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// The request never produced a response (connection refused, timeout, offline...).
    Transport(String),
    /// The server returned an error message where the body was able to be parsed.
    ServerMessage(ErrorMessage),
    /// The server returned an invalid JSON response.
    InvalidJson(serde_json::Error),
    /// An I/O error occurred while reading a recorded response from disk.
    Io(PathBuf, std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::InvalidJson(error)
    }
}

impl Error {
    /// If the server answered with an error status, return it.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ServerMessage(msg) => Some(msg.code),
            Error::Transport(_) | Error::InvalidJson(_) | Error::Io(..) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The dashboard API as seen by the slot visualization engine.
#[async_trait]
pub trait SlotVizApi: Send + Sync + 'static {
    /// Fetches the slot visualization of a dashboard group.
    ///
    /// With `bypass_cache` set the implementation must not answer from a response cache.
    async fn get_slot_viz(
        &self,
        dashboard_id: &DashboardId,
        group_id: GroupId,
        bypass_cache: bool,
    ) -> Result<Vec<SlotVizEpoch>, Error>;

    /// Returns the chain id of the network the API currently serves.
    fn current_chain_id(&self) -> ChainId;
}

/// Returns the API resource of the slot visualization of a dashboard group.
pub fn slot_viz_resource(dashboard_id: &DashboardId, group_id: GroupId) -> String {
    let mut resource = format!("/validator-dashboards/{}/slot-viz", dashboard_id);
    if group_id != ALL_GROUPS {
        resource.push_str(&format!("?group_ids={}", group_id));
    }
    resource
}
