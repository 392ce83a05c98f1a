//! # Contract Runtime
//!
//! Hosts one contract (the token ledger or a record preset) over a
//! versioned ledger:
//!
//! - `config` - environment-driven `RuntimeConfig`
//! - `identity` - credential to identity derivation
//! - `registry` - validated name to handler table
//! - `runtime` - the invoke/commit/publish cycle
//! - `session` - JSON-lines serving loop
//!
//! The `contract-runtime` binary drives a runtime from JSON lines on stdin.

#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod identity;
pub mod registry;
pub mod runtime;
pub mod session;

pub use config::{ConfigError, ContractSelection, IdentityMode, RuntimeConfig};
pub use identity::{provider_for, CertificateDigestProvider, IdentityProvider, PublicKeyProvider};
pub use registry::{Handler, OperationRegistry, RegistryError};
pub use runtime::{ContractRuntime, RuntimeError, UNKNOWN_OPERATION_LABEL};
pub use session::{decode_line, serve_lines};
