//! # Token Events
//!
//! Payloads the engine records on its transaction. The runtime publishes
//! them after commit.

use serde::{Deserialize, Serialize};
use shared_types::entities::Identity;

use crate::domain::amount::Amount;

/// Event names.
pub mod topics {
    /// Balance moved between two accounts.
    pub const TRANSFER: &str = "transfer";
    /// Allowance set.
    pub const APPROVE: &str = "approve";
}

/// Emitted by `transfer` and `transferFrom`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: Identity,
    pub to: Identity,
    pub amount: Amount,
}

/// Emitted by `approve`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveEvent {
    pub from: Identity,
    pub spender: Identity,
    pub amount: Amount,
}
