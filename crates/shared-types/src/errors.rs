//! # Error Types
//!
//! The contract error taxonomy. Every handler failure is one of these
//! variants, and every variant maps to exactly one response status.

use thiserror::Error;

use crate::invocation::status;

/// Failures raised by the versioned key-value store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store is unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A query could not be executed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// The key is not acceptable to the store.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The event could not be recorded.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Any other backend failure.
    #[error("store error: {0}")]
    Other(String),
}

/// Expected argument count of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// At least this many arguments.
    AtLeast(usize),
}

impl Arity {
    /// Check an actual argument count.
    #[must_use]
    pub fn accepts(&self, given: usize) -> bool {
        match *self {
            Self::Exact(n) => given == n,
            Self::AtLeast(n) => given >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Errors a contract invocation can end with.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    /// Wrong number of arguments for the operation.
    #[error("Incorrect number of arguments. Expecting {expected} arguments: {given} given.")]
    ArgumentCount {
        /// Accepted arity.
        expected: Arity,
        /// Number of arguments supplied.
        given: usize,
    },

    /// A required key segment was empty.
    #[error("Key must not be empty: {segment}")]
    EmptyKey {
        /// Name of the empty segment.
        segment: String,
    },

    /// Key could not be encoded injectively.
    #[error("Key encoding error: {0}")]
    KeyEncoding(String),

    /// No value stored under the key.
    #[error("No value found for key {key}")]
    NotFound {
        /// Logical key that was looked up.
        key: String,
    },

    /// Amount argument was not a valid amount for the operation.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Attempt to store a negative balance or allowance.
    #[error("Invalid balance: {0} is negative")]
    InvalidBalance(i64),

    /// Source account balance is lower than the amount.
    #[error("not enough funds: balance {available}, required {required}")]
    InsufficientFunds {
        /// Current balance.
        available: i64,
        /// Requested amount.
        required: i64,
    },

    /// Spender allowance is lower than the amount.
    #[error("spender not have allowance for amount: allowance {available}, required {required}")]
    InsufficientAllowance {
        /// Current allowance.
        available: i64,
        /// Requested amount.
        required: i64,
    },

    /// Transfer from an account to itself.
    #[error("forbidden to transfer to same account")]
    SelfTransfer,

    /// Credit would overflow the balance type.
    #[error("arithmetic overflow")]
    Overflow,

    /// A document argument does not have the required JSON shape.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Encoding or decoding a stored value failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The caller's credential could not be resolved to an identity.
    #[error("Unable to resolve caller identity: {0}")]
    Identity(String),

    /// The token was already initialised.
    #[error("Token already initialized")]
    AlreadyInitialized,

    /// No handler registered under the operation name.
    #[error("Invalid function name: {name}")]
    UnknownOperation {
        /// Requested operation.
        name: String,
    },

    /// The transaction's read-set was invalidated before commit.
    #[error("MVCC read conflict on key {key}")]
    CommitConflict {
        /// First conflicting key.
        key: String,
    },

    /// Failure inside the store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContractError {
    /// Response status for this error.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::ArgumentCount { .. }
            | Self::EmptyKey { .. }
            | Self::KeyEncoding(_)
            | Self::InvalidAmount(_)
            | Self::InvalidBalance(_)
            | Self::InsufficientFunds { .. }
            | Self::InsufficientAllowance { .. }
            | Self::SelfTransfer
            | Self::Overflow
            | Self::InvalidDocument(_) => status::BAD_REQUEST,
            Self::Identity(_) => status::FORBIDDEN,
            Self::NotFound { .. } | Self::UnknownOperation { .. } => status::NOT_FOUND,
            Self::AlreadyInitialized | Self::CommitConflict { .. } => status::CONFLICT,
            Self::Serialization(_) | Self::Store(_) => status::INTERNAL_ERROR,
        }
    }

    /// Short machine-readable name, used as a metrics label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ArgumentCount { .. } => "argument_count",
            Self::EmptyKey { .. } => "empty_key",
            Self::KeyEncoding(_) => "key_encoding",
            Self::NotFound { .. } => "not_found",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InvalidBalance(_) => "invalid_balance",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::InsufficientAllowance { .. } => "insufficient_allowance",
            Self::SelfTransfer => "self_transfer",
            Self::Overflow => "overflow",
            Self::InvalidDocument(_) => "invalid_document",
            Self::Serialization(_) => "serialization",
            Self::Identity(_) => "identity",
            Self::AlreadyInitialized => "already_initialized",
            Self::UnknownOperation { .. } => "unknown_operation",
            Self::CommitConflict { .. } => "commit_conflict",
            Self::Store(_) => "store",
        }
    }
}

impl From<serde_json::Error> for ContractError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias for handler code.
pub type ContractResult<T> = Result<T, ContractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ContractError::SelfTransfer.status(), 400);
        assert_eq!(ContractError::InvalidDocument("[]".into()).status(), 400);
        assert_eq!(
            ContractError::NotFound { key: "k".into() }.status(),
            404
        );
        assert_eq!(
            ContractError::UnknownOperation { name: "x".into() }.status(),
            404
        );
        assert_eq!(
            ContractError::CommitConflict { key: "k".into() }.status(),
            409
        );
        assert_eq!(
            ContractError::Store(StoreError::Unavailable("down".into())).status(),
            500
        );
    }

    #[test]
    fn test_unknown_operation_message() {
        let err = ContractError::UnknownOperation {
            name: "mint".into(),
        };
        assert_eq!(err.to_string(), "Invalid function name: mint");
    }

    #[test]
    fn test_argument_count_message() {
        let err = ContractError::ArgumentCount {
            expected: Arity::Exact(2),
            given: 3,
        };
        assert_eq!(
            err.to_string(),
            "Incorrect number of arguments. Expecting 2 arguments: 3 given."
        );
    }

    #[test]
    fn test_arity() {
        assert!(Arity::Exact(1).accepts(1));
        assert!(!Arity::Exact(1).accepts(2));
        assert!(Arity::AtLeast(1).accepts(5));
        assert!(!Arity::AtLeast(1).accepts(0));
    }
}
