//! # Batch Records
//!
//! Multi-key `set`/`get`/`del`. A failing key never fails the batch: it is
//! reported under `errors` while the other keys go through. The one
//! exception is a `get` of a single missing key, which is a plain
//! `NotFound`.

use lc_01_world_state::{validate_simple_key, WorldState};
use serde::{Deserialize, Serialize};
use shared_types::errors::{ContractError, ContractResult};
use tracing::debug;

/// Error text for a `set` key without a value.
pub const NO_VALUE: &str = "No value for key";

/// Error text for a missing key in a multi-key `get`.
pub const NOT_FOUND: &str = "404 - No value found for key";

/// A key that went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub key: String,
    pub value: String,
}

/// A key that did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub key: String,
    pub error: String,
}

/// Outcome of a batch `set` or `get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub result: Vec<BatchEntry>,
    pub errors: Vec<BatchFailure>,
}

impl BatchResult {
    fn succeeded(&mut self, key: &str, value: String) {
        self.result.push(BatchEntry {
            key: key.to_string(),
            value,
        });
    }

    fn failed(&mut self, key: &str, error: impl Into<String>) {
        self.errors.push(BatchFailure {
            key: key.to_string(),
            error: error.into(),
        });
    }
}

fn check_key(key: &str) -> ContractResult<()> {
    if key.is_empty() {
        return Err(ContractError::EmptyKey {
            segment: "key".to_string(),
        });
    }
    validate_simple_key(key)
}

/// Store `key, value` pairs. A trailing key without a value and any key
/// with an empty value are reported as `NO_VALUE`.
pub async fn batch_set(ctx: &mut dyn WorldState, args: &[String]) -> ContractResult<BatchResult> {
    let mut outcome = BatchResult::default();
    for pair in args.chunks(2) {
        let key = pair[0].as_str();
        let value = pair.get(1).map(String::as_str).unwrap_or_default();

        if value.is_empty() {
            debug!(tx_id = %ctx.tx_id(), key = %key, "Skipping key without value");
            outcome.failed(key, NO_VALUE);
            continue;
        }
        if let Err(e) = check_key(key) {
            outcome.failed(key, e.to_string());
            continue;
        }
        match ctx.put_state(key, value.as_bytes().to_vec()).await {
            Ok(()) => outcome.succeeded(key, value.to_string()),
            Err(e) => outcome.failed(key, e.to_string()),
        }
    }
    Ok(outcome)
}

/// Read every key in `keys`.
pub async fn batch_get(ctx: &mut dyn WorldState, keys: &[String]) -> ContractResult<BatchResult> {
    let mut outcome = BatchResult::default();
    for key in keys {
        if let Err(e) = check_key(key) {
            outcome.failed(key, e.to_string());
            continue;
        }
        match ctx.get_state(key).await {
            Ok(Some(value)) => {
                outcome.succeeded(key, String::from_utf8_lossy(&value).into_owned());
            }
            Ok(None) if keys.len() == 1 => {
                return Err(ContractError::NotFound { key: key.clone() });
            }
            Ok(None) => outcome.failed(key, NOT_FOUND),
            Err(e) => outcome.failed(key, e.to_string()),
        }
    }
    Ok(outcome)
}

/// Delete every key in `keys`; returns the deleted keys. Unlike `set` and
/// `get`, a store failure aborts the whole batch.
pub async fn batch_delete(ctx: &mut dyn WorldState, keys: &[String]) -> ContractResult<Vec<String>> {
    for key in keys {
        check_key(key)?;
    }
    for key in keys {
        ctx.delete_state(key).await?;
    }
    Ok(keys.to_vec())
}
