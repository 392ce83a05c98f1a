//! Ports (hexagonal architecture).

pub mod ledger;
pub mod world_state;

pub use ledger::{CommitReceipt, Ledger};
pub use world_state::{HistoryStream, QueryStream, WorldState};
