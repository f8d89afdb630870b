//! Types shared by the slot visualization crates: slots, epochs and the static description of a
//! chain network.

#[macro_use]
mod slot_epoch_macros;

mod chain_network;
mod slot_epoch;

pub use chain_network::{ChainId, ChainNetwork};
pub use slot_epoch::{Epoch, Slot};
