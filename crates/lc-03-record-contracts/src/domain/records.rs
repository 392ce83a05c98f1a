//! # Keyed Records
//!
//! Single-record storage shared by every preset: resolve the key, then
//! put, get, delete, trace history, scan or query.

use lc_01_world_state::{
    collect_history, collect_records, history, validate_simple_key, KeySchema, WorldState,
};
use shared_types::entities::{HistoryEntry, QueryRecord};
use shared_types::errors::{ContractError, ContractResult};
use tracing::debug;

use crate::operations::RecordKey;

/// A record key after validation and encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Key the value is stored under.
    pub storage: String,
    /// Record identifier returned to callers: the last key segment.
    pub id: String,
    /// Human-readable form used in error messages.
    pub display: String,
}

fn require_segments<S: AsRef<str>>(names: &[&str], values: &[S]) -> ContractResult<()> {
    match names
        .iter()
        .zip(values)
        .find(|(_, value)| value.as_ref().is_empty())
    {
        Some((name, _)) => Err(ContractError::EmptyKey {
            segment: (*name).to_string(),
        }),
        None => Ok(()),
    }
}

/// Validate `values` against `key` and encode them.
pub fn resolve_key<S: AsRef<str>>(key: &RecordKey, values: &[S]) -> ContractResult<ResolvedKey> {
    require_segments(&key.segment_names(), values)?;

    let storage = match key {
        RecordKey::Simple(_) => {
            let raw = values.first().map(|v| v.as_ref()).unwrap_or_default();
            validate_simple_key(raw)?;
            raw.to_string()
        }
        RecordKey::Composite(schema) => schema.encode(values)?,
    };
    let parts: Vec<&str> = values.iter().map(|v| v.as_ref()).collect();
    Ok(ResolvedKey {
        storage,
        id: parts.last().copied().unwrap_or_default().to_string(),
        display: parts.join("~"),
    })
}

/// Buffer `value` under the key.
pub async fn put_record(
    ctx: &mut dyn WorldState,
    key: &ResolvedKey,
    value: Vec<u8>,
) -> ContractResult<()> {
    debug!(tx_id = %ctx.tx_id(), key = %key.display, "Storing record");
    ctx.put_state(&key.storage, value).await?;
    Ok(())
}

/// Stored value of the key; `NotFound` when absent.
pub async fn get_record(ctx: &mut dyn WorldState, key: &ResolvedKey) -> ContractResult<Vec<u8>> {
    ctx.get_state(&key.storage)
        .await?
        .ok_or_else(|| ContractError::NotFound {
            key: key.display.clone(),
        })
}

/// Buffer a delete of the key.
pub async fn delete_record(ctx: &mut dyn WorldState, key: &ResolvedKey) -> ContractResult<()> {
    debug!(tx_id = %ctx.tx_id(), key = %key.display, "Deleting record");
    ctx.delete_state(&key.storage).await?;
    Ok(())
}

/// Every version the key has had, most recent first.
pub async fn record_history(
    ctx: &mut dyn WorldState,
    key: &ResolvedKey,
) -> ContractResult<Vec<HistoryEntry>> {
    let stream = history(ctx, &key.storage).await?;
    Ok(collect_history(stream).await?)
}

/// Records of `schema` whose leading segments equal `leading`.
pub async fn scan_records(
    ctx: &mut dyn WorldState,
    schema: &KeySchema,
    leading: &[String],
) -> ContractResult<Vec<QueryRecord>> {
    let names: Vec<&str> = schema.segment_names().iter().map(String::as_str).collect();
    require_segments(&names, leading)?;
    schema.encode_prefix(leading)?;

    let stream = ctx
        .get_state_by_partial_composite_key(schema.object_type(), leading)
        .await?;
    Ok(collect_records(stream).await?)
}

/// Stored documents matching a selector query.
pub async fn query_records(
    ctx: &mut dyn WorldState,
    selector: &str,
) -> ContractResult<Vec<QueryRecord>> {
    let stream = ctx.get_query_result(selector).await?;
    Ok(collect_records(stream).await?)
}
