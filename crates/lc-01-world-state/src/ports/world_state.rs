//! # World State Port
//!
//! The transaction-scoped view of the ledger a handler executes against.
//! One instance per invocation; every read is recorded for commit-time
//! validation and every write is buffered until commit.

use async_trait::async_trait;
use shared_types::entities::{HistoryEntry, QueryRecord};
use shared_types::errors::StoreError;
use std::pin::Pin;
use tokio_stream::Stream;

/// Most-recent-first stream of a key's history.
pub type HistoryStream = Pin<Box<dyn Stream<Item = Result<HistoryEntry, StoreError>> + Send>>;

/// Stream of key/value results from a range or rich query.
pub type QueryStream = Pin<Box<dyn Stream<Item = Result<QueryRecord, StoreError>> + Send>>;

/// Transaction simulation context.
///
/// Reads never observe the transaction's own buffered writes; within one
/// transaction the last write to a key wins.
#[async_trait]
pub trait WorldState: Send + Sync {
    /// Id of the transaction being simulated.
    fn tx_id(&self) -> &str;

    /// Committed value of `key`, if any. Records the read.
    async fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Buffer a write.
    async fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Buffer a delete.
    async fn delete_state(&mut self, key: &str) -> Result<(), StoreError>;

    /// Every committed write and delete of `key`, most recent first. Empty
    /// for keys that were never written.
    async fn get_history_for_key(&mut self, key: &str) -> Result<HistoryStream, StoreError>;

    /// Committed composite keys whose leading segments equal `attributes`,
    /// in key order. The scanned range is recorded for phantom detection.
    async fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[String],
    ) -> Result<QueryStream, StoreError>;

    /// Committed JSON documents matching a selector query. Not re-validated
    /// at commit.
    async fn get_query_result(&mut self, query: &str) -> Result<QueryStream, StoreError>;

    /// Record the transaction's event. Only the last call counts.
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StoreError>;
}
