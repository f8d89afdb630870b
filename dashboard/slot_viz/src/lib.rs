//! Slot visualization of a validator dashboard.
//!
//! `SlotVizProvider` keeps the slots of a dashboard group current and derives the chain position
//! relative to their duties. The remaining modules are pure helpers turning slots into what a
//! renderer shows.

mod config;
pub mod details;
pub mod duty;
pub mod filter;
pub mod grid;
pub mod metrics;
mod provider;
pub mod widget;

pub use crate::config::{Config, DEFAULT_EXPLORER_URL, DEFAULT_ROWS_TO_SHOW, DEFAULT_SLOTS_PER_ROW};
pub use crate::details::SlotDetails;
pub use crate::duty::DutyColor;
pub use crate::filter::{DutyFilter, DutyFilters};
pub use crate::grid::{AnimationCursor, SlotIcon, SlotPresentation};
pub use crate::provider::{flatten_epochs, SlotVizProvider, SlotVizView};
pub use crate::widget::WidgetState;
