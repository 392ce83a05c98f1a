//! # Ledger-Contracts Test Suite
//!
//! Cross-crate flows driven through `ContractRuntime`, the same entry
//! point the binary uses.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs      # runtimes, credentials, seeding
//!     ├── token_flows.rs   # token scenarios end to end
//!     ├── record_flows.rs  # record presets end to end
//!     └── concurrency.rs   # MVCC conflicts and event ordering
//! ```
//!
//! ```bash
//! cargo test -p lc-tests
//! cargo test -p lc-tests integration::token_flows::
//! ```

#![allow(dead_code)]

pub mod integration;
