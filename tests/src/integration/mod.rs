//! Cross-crate invocation flows.

pub mod fixtures;

mod concurrency;
mod record_flows;
mod token_flows;
