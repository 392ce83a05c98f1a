//! # Core Ledger Entities
//!
//! Entities shared by the world-state store, the handler crates and the
//! runtime.
//!
//! ## Clusters
//!
//! - **Participants**: `Identity`, `Credential`
//! - **Versioned state**: `Version`, `HistoryEntry`, `QueryRecord`
//! - **Commit**: `ChaincodeEvent`, `CommitOutcome`

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: PARTICIPANTS
// =============================================================================

/// Transaction identifier assigned by the host peer.
pub type TxId = String;

/// Stable public identifier of a ledger participant.
///
/// Produced by an identity provider from the caller's credential. Never
/// created or destroyed by the handlers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The signed creator of a transaction proposal, as handed over by the peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Membership service provider the creator belongs to.
    pub msp_id: String,
    /// Encoded certificate (or bare public key) of the creator.
    pub certificate: Vec<u8>,
}

impl Credential {
    /// Build a credential from an MSP id and certificate bytes.
    pub fn new(msp_id: impl Into<String>, certificate: impl Into<Vec<u8>>) -> Self {
        Self {
            msp_id: msp_id.into(),
            certificate: certificate.into(),
        }
    }
}

// =============================================================================
// CLUSTER B: VERSIONED STATE
// =============================================================================

/// Version stamp of a committed value: the block and the position of the
/// writing transaction inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Block number the write was committed in.
    pub block_num: u64,
    /// Index of the transaction within the block.
    pub tx_num: u64,
}

impl Version {
    /// Create a version stamp.
    #[must_use]
    pub const fn new(block_num: u64, tx_num: u64) -> Self {
        Self { block_num, tx_num }
    }
}

/// One write or delete ever applied to a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Transaction that produced this version.
    pub tx_id: TxId,
    /// Value written (empty for deletes).
    pub value: Vec<u8>,
    /// True when the transaction deleted the key.
    pub is_delete: bool,
    /// Global commit sequence position, strictly increasing.
    pub sequence: u64,
}

/// A key/value pair returned by range or rich queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Storage key.
    pub key: String,
    /// Stored value (projected for rich queries with `fields`).
    pub value: Vec<u8>,
}

// =============================================================================
// CLUSTER C: COMMIT
// =============================================================================

/// An event recorded by a transaction for off-ledger subscribers.
///
/// Only delivered once the transaction commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    /// Event name, e.g. `transfer`.
    pub topic: String,
    /// JSON payload.
    pub payload: Vec<u8>,
}

/// Result of submitting a simulated transaction for commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitOutcome {
    /// Read-set was still valid; all writes applied.
    Committed {
        /// Block the transaction was committed in.
        block_num: u64,
    },
    /// Another committed transaction invalidated the read-set; nothing applied.
    ConflictAborted {
        /// First key whose version no longer matched.
        key: String,
    },
}

impl CommitOutcome {
    /// True for `Committed`.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}
