//! Adapters (hexagonal architecture).

pub mod memory_ledger;

pub use memory_ledger::{InMemoryLedger, TxSimulator};
