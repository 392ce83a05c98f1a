//! # Token Operations
//!
//! The names and arities the token contract answers to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every operation of the token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenOperation {
    BalanceOf,
    Allowance,
    Approve,
    Transfer,
    TransferFrom,
    Symbol,
    Name,
    TotalSupply,
    BalanceHistory,
    Init,
}

impl TokenOperation {
    /// All operations, in registration order.
    pub const ALL: [Self; 10] = [
        Self::BalanceOf,
        Self::Allowance,
        Self::Approve,
        Self::Transfer,
        Self::TransferFrom,
        Self::Symbol,
        Self::Name,
        Self::TotalSupply,
        Self::BalanceHistory,
        Self::Init,
    ];

    /// Function name used on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BalanceOf => "balanceOf",
            Self::Allowance => "allowance",
            Self::Approve => "approve",
            Self::Transfer => "transfer",
            Self::TransferFrom => "transferFrom",
            Self::Symbol => "symbol",
            Self::Name => "name",
            Self::TotalSupply => "totalSupply",
            Self::BalanceHistory => "balanceHistory",
            Self::Init => "init",
        }
    }

    /// Exact number of string arguments.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Symbol | Self::Name | Self::TotalSupply => 0,
            Self::BalanceOf | Self::BalanceHistory => 1,
            Self::Allowance | Self::Approve | Self::Transfer => 2,
            Self::TransferFrom | Self::Init => 3,
        }
    }

    /// Queries never reach commit.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::BalanceOf
                | Self::Allowance
                | Self::Symbol
                | Self::Name
                | Self::TotalSupply
                | Self::BalanceHistory
        )
    }

    /// Whether the handler needs the caller's identity.
    #[must_use]
    pub const fn requires_caller(self) -> bool {
        matches!(
            self,
            Self::Approve | Self::Transfer | Self::TransferFrom | Self::Init
        )
    }

    /// Look up an operation by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for TokenOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
