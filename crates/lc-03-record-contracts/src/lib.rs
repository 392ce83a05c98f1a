//! # LC-03 Record Contracts
//!
//! Generic keyed-document contracts sharing the ledger's keying and history
//! conventions. A contract is a preset: a table of named operations, each
//! bound to one of a handful of handler shapes.
//!
//! ## Handler Shapes
//!
//! | Shape | Args | Response |
//! |-------|------|----------|
//! | Put | key segments, document | record id |
//! | Put pair | key, value | `key:value` |
//! | Get | key segments | stored document |
//! | Delete | key segments | record id |
//! | History | key segments | `[{"TxId","Value","IsDelete","Sequence"}]` |
//! | Batch set / get | `k, v, ...` / `k, ...` | `{"result":[...],"errors":[...]}` |
//! | Batch delete | `k, ...` | deleted keys |
//! | Scan | leading segments | `[{"Key","Record"}]` |
//! | Query | selector JSON | `[{"Key","Record"}]` |
//! | Selector | template parameters | `[{"Key","Record"}]`, separators shown as `\|\|` |
//! | Device event | device id, time, document | time |
//! | Version | - | `<contract>:<version>` |
//!
//! Empty key segments fail with `EmptyKey`; segments holding the composite
//! separator fail with `KeyEncoding`.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod domain;
pub mod handler;
pub mod operations;
pub mod presets;

pub use handler::{execute, PROBE_RESPONSE};
pub use operations::{RecordKey, RecordKind, RecordOperation, SelectorTemplate};
pub use presets::{topics, ContractPreset};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
