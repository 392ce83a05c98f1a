//! # Shared Types Crate
//!
//! Entities, the invocation/response pair and the contract error taxonomy
//! used by every crate in the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate types live here and nowhere else.
//! - **One Error Taxonomy**: handlers only ever fail with `ContractError`;
//!   each variant carries exactly one response status.

pub mod entities;
pub mod errors;
pub mod invocation;

pub use entities::*;
pub use errors::*;
pub use invocation::{status, Invocation, Response};
