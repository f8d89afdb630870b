use serde::{Deserialize, Serialize};

/// Slots in one row of the grid.
pub const DEFAULT_SLOTS_PER_ROW: usize = 8;
/// Rows of the grid shown at once.
pub const DEFAULT_ROWS_TO_SHOW: usize = 4;
pub const DEFAULT_EXPLORER_URL: &str = "https://beaconcha.in";

/// Settings of the slot visualization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub slots_per_row: usize,
    pub rows_to_show: usize,
    /// Ask the API to skip its response cache on every fetch.
    pub bypass_cache: bool,
    /// Base URL slot detail links point to.
    pub explorer_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slots_per_row: DEFAULT_SLOTS_PER_ROW,
            rows_to_show: DEFAULT_ROWS_TO_SHOW,
            bypass_cache: true,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
        }
    }
}
