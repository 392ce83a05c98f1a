//! # LC-02 Token Ledger
//!
//! Fungible token contract: balances, allowances and atomic multi-key
//! transfers over a transaction-scoped world state.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Balances never negative | `domain/accounts.rs` - `set_balance()` |
//! | Allowances never negative | `domain/allowances.rs` - `set_allowance()` |
//! | Conservation on transfer | `domain/engine.rs` - `transfer()`, `transfer_from()` |
//! | Validation before any write | `domain/engine.rs` |
//!
//! ## Storage Layout
//!
//! | Data | Key | Value |
//! |------|-----|-------|
//! | Balance | `("BALANCE", identity)` | JSON integer |
//! | Allowance | `("APPROVE", owner, spender)` | JSON integer |
//! | Symbol / name | `symbol` / `name` | UTF-8 |
//! | Total supply | `totalSupply` | JSON integer |
//!
//! ## Operations
//!
//! | Name | Args | Writes |
//! |------|------|--------|
//! | `balanceOf` | publicKey | - |
//! | `allowance` | ownerPublicKey, spenderPublicKey | - |
//! | `approve` | spenderPublicKey, amount | allowance |
//! | `transfer` | toPublicKey, amount | 2 balances |
//! | `transferFrom` | fromPublicKey, toPublicKey, amount | 2 balances, allowance |
//! | `symbol`, `name`, `totalSupply` | - | - |
//! | `balanceHistory` | publicKey | - |
//! | `init` | symbol, name, totalSupply | metadata, caller balance |
//!
//! ## Usage Example
//!
//! ```ignore
//! use lc_02_token_ledger::prelude::*;
//!
//! let mut tx = ledger.begin("tx-1");
//! let remaining = engine::transfer(&mut tx, &alice, &bob, 30).await?;
//! ledger.commit(tx).await?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod domain;
pub mod events;
pub mod handler;
pub mod operations;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::domain::{
        allowance_key, balance_key, engine, get_allowance, get_balance, metadata, parse_amount,
        set_allowance, set_balance, Amount,
    };
    pub use crate::events::{topics, ApproveEvent, TransferEvent};
    pub use crate::handler::execute;
    pub use crate::operations::TokenOperation;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Contract name used in logs, metrics and published events.
pub const CONTRACT_NAME: &str = "erc20";
