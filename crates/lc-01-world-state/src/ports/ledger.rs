//! # Ledger Port
//!
//! Opens transaction simulations and commits them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::entities::{ChaincodeEvent, CommitOutcome, TxId};
use shared_types::errors::StoreError;

use super::world_state::WorldState;

/// What a commit attempt produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Committed transaction.
    pub tx_id: TxId,
    /// Committed or aborted.
    pub outcome: CommitOutcome,
    /// The transaction's event; `None` when aborted or when none was set.
    pub event: Option<ChaincodeEvent>,
}

/// A versioned key-value ledger with optimistic concurrency control.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Simulation context handed to handlers.
    type Tx: WorldState + 'static;

    /// Start simulating a transaction.
    fn begin(&self, tx_id: &str) -> Self::Tx;

    /// Validate the transaction's read-set and apply its writes atomically.
    ///
    /// A stale read yields `CommitOutcome::ConflictAborted` and applies
    /// nothing. Dropping a `Tx` without committing discards it.
    async fn commit(&self, tx: Self::Tx) -> Result<CommitReceipt, StoreError>;

    /// Number of committed blocks.
    fn height(&self) -> u64;
}
