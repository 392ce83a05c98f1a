//! # lc-01-world-state
//!
//! Versioned world state for ledger contracts.
//!
//! ## Role in System
//!
//! - **Key Codec**: injective composite keys compatible with the host ledger
//! - **Transaction simulation**: handlers read committed state and buffer
//!   writes; nothing is visible until commit
//! - **MVCC commit**: read-set and range validation, total abort on conflict
//! - **History**: append-only per-key audit trail, most recent first
//!
//! ```text
//! Ledger::begin ──→ TxSimulator (WorldState) ──→ handler
//!                        │ reads: (key, version)
//!                        │ writes: ordered, last wins
//!                        ▼
//! Ledger::commit ──→ detect_conflict ──→ Committed | ConflictAborted
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
