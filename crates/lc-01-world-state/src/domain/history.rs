//! # History Reader
//!
//! Audit trail of a key and its JSON rendering.

use serde::Serialize;
use serde_json::Value;
use shared_types::entities::{HistoryEntry, QueryRecord};
use shared_types::errors::StoreError;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::ports::{HistoryStream, QueryStream, WorldState};

/// Lazy history of `key`, most recent first.
pub async fn history(ctx: &mut dyn WorldState, key: &str) -> Result<HistoryStream, StoreError> {
    debug!(tx_id = %ctx.tx_id(), key = ?key, "Reading key history");
    ctx.get_history_for_key(key).await
}

/// Drain a history stream.
pub async fn collect_history(mut stream: HistoryStream) -> Result<Vec<HistoryEntry>, StoreError> {
    let mut entries = Vec::new();
    while let Some(entry) = stream.next().await {
        entries.push(entry?);
    }
    Ok(entries)
}

/// Drain a query stream.
pub async fn collect_records(mut stream: QueryStream) -> Result<Vec<QueryRecord>, StoreError> {
    let mut records = Vec::new();
    while let Some(record) = stream.next().await {
        records.push(record?);
    }
    Ok(records)
}

/// Stored bytes as a JSON value: the parsed document when the bytes are
/// JSON, a string otherwise.
#[must_use]
pub fn value_document(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[derive(Serialize)]
struct HistoryRecordJson {
    #[serde(rename = "TxId")]
    tx_id: String,
    #[serde(rename = "Value")]
    value: Value,
    #[serde(rename = "IsDelete")]
    is_delete: bool,
    #[serde(rename = "Sequence")]
    sequence: u64,
}

/// `[{"TxId", "Value", "IsDelete", "Sequence"}]`. Deletes render `Value`
/// as `null`.
pub fn history_json(entries: &[HistoryEntry]) -> Result<Vec<u8>, serde_json::Error> {
    let records: Vec<HistoryRecordJson> = entries
        .iter()
        .map(|e| HistoryRecordJson {
            tx_id: e.tx_id.clone(),
            value: if e.is_delete {
                Value::Null
            } else {
                value_document(&e.value)
            },
            is_delete: e.is_delete,
            sequence: e.sequence,
        })
        .collect();
    serde_json::to_vec(&records)
}

#[derive(Serialize)]
struct KeyRecordJson<'a> {
    #[serde(rename = "Key")]
    key: &'a str,
    #[serde(rename = "Record")]
    record: Value,
}

/// `[{"Key", "Record"}]` for range and rich query results.
pub fn records_json(records: &[QueryRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let rendered: Vec<KeyRecordJson<'_>> = records
        .iter()
        .map(|r| KeyRecordJson {
            key: &r.key,
            record: value_document(&r.value),
        })
        .collect();
    serde_json::to_vec(&rendered)
}
