//! # In-Memory Ledger
//!
//! Versioned key-value store with per-key history and MVCC commits. Each
//! committed transaction forms its own block.

use async_trait::async_trait;
use ledger_telemetry::{log_key_event, HistogramTimer, COMMIT_DURATION, LEDGER_HEIGHT};
use parking_lot::RwLock;
use shared_types::entities::{ChaincodeEvent, CommitOutcome, HistoryEntry, QueryRecord, Version};
use shared_types::errors::StoreError;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::{
    detect_conflict, partial_composite_key, CommittedVersions, RangeRead, ReadWriteSet, Selector,
    WriteOp,
};
use crate::ports::{CommitReceipt, HistoryStream, Ledger, QueryStream, WorldState};

#[derive(Debug, Clone)]
struct VersionedValue {
    value: Vec<u8>,
    version: Version,
}

#[derive(Debug, Default)]
struct LedgerState {
    values: BTreeMap<String, VersionedValue>,
    history: HashMap<String, Vec<HistoryEntry>>,
    height: u64,
    next_sequence: u64,
}

impl LedgerState {
    /// Apply writes as a new block.
    fn apply(&mut self, tx_id: &str, writes: BTreeMap<String, WriteOp>) -> u64 {
        self.height += 1;
        let version = Version::new(self.height, 0);

        for (key, op) in writes {
            let (value, is_delete) = match op {
                WriteOp::Put(value) => {
                    self.values.insert(
                        key.clone(),
                        VersionedValue {
                            value: value.clone(),
                            version,
                        },
                    );
                    (value, false)
                }
                WriteOp::Delete => {
                    self.values.remove(&key);
                    (Vec::new(), true)
                }
            };
            self.history.entry(key).or_default().push(HistoryEntry {
                tx_id: tx_id.to_string(),
                value,
                is_delete,
                sequence: self.next_sequence,
            });
            self.next_sequence += 1;
        }

        LEDGER_HEIGHT.set(self.height as f64);
        self.height
    }

    fn range<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a VersionedValue)> + 'a {
        self.values
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
    }
}

impl CommittedVersions for LedgerState {
    fn committed_version(&self, key: &str) -> Option<Version> {
        self.values.get(key).map(|v| v.version)
    }

    fn committed_range(&self, prefix: &str) -> Vec<(String, Version)> {
        self.range(prefix)
            .map(|(k, v)| (k.clone(), v.version))
            .collect()
    }
}

/// Shared in-memory ledger. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit key/value pairs directly as one block, bypassing simulation.
    pub fn seed<I, K>(&self, tx_id: &str, entries: I) -> u64
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let writes = entries
            .into_iter()
            .map(|(k, v)| (k.into(), WriteOp::Put(v)))
            .collect();
        self.state.write().apply(tx_id, writes)
    }

    /// Committed value of `key`.
    pub fn committed_value(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().values.get(key).map(|v| v.value.clone())
    }

    /// Committed version of `key`.
    pub fn committed_version(&self, key: &str) -> Option<Version> {
        self.state.read().committed_version(key)
    }

    /// Number of keys with a live value.
    pub fn len(&self) -> usize {
        self.state.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    type Tx = TxSimulator;

    fn begin(&self, tx_id: &str) -> TxSimulator {
        debug!(tx_id = %tx_id, "Transaction simulation started");
        TxSimulator {
            tx_id: tx_id.to_string(),
            state: Arc::clone(&self.state),
            rwset: ReadWriteSet::new(),
            event: None,
        }
    }

    #[instrument(skip(self, tx), fields(tx_id = %tx.tx_id))]
    async fn commit(&self, tx: TxSimulator) -> Result<CommitReceipt, StoreError> {
        let _timer = HistogramTimer::new(&COMMIT_DURATION);
        let TxSimulator {
            tx_id,
            rwset,
            event,
            ..
        } = tx;

        let mut state = self.state.write();
        if let Some(conflict) = detect_conflict(&rwset, &*state) {
            log_key_event!(
                warn,
                tx_id,
                conflict.key,
                "Commit aborted on stale read",
                conflict_type = ?conflict.conflict_type
            );
            return Ok(CommitReceipt {
                tx_id,
                outcome: CommitOutcome::ConflictAborted { key: conflict.key },
                event: None,
            });
        }

        let block_num = state.apply(&tx_id, rwset.into_writes());
        drop(state);

        debug!(block_num, "Transaction committed");
        Ok(CommitReceipt {
            tx_id,
            outcome: CommitOutcome::Committed { block_num },
            event,
        })
    }

    fn height(&self) -> u64 {
        self.state.read().height
    }
}

/// Simulation context over an `InMemoryLedger`.
pub struct TxSimulator {
    tx_id: String,
    state: Arc<RwLock<LedgerState>>,
    rwset: ReadWriteSet,
    event: Option<ChaincodeEvent>,
}

impl TxSimulator {
    /// Buffered read/write sets.
    pub fn rwset(&self) -> &ReadWriteSet {
        &self.rwset
    }

    /// Event recorded so far.
    pub fn event(&self) -> Option<&ChaincodeEvent> {
        self.event.as_ref()
    }
}

#[async_trait]
impl WorldState for TxSimulator {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    async fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let found = self
            .state
            .read()
            .values
            .get(key)
            .map(|v| (v.value.clone(), v.version));
        self.rwset.record_read(key, found.as_ref().map(|(_, v)| *v));
        Ok(found.map(|(value, _)| value))
    }

    async fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("key must not be empty".to_string()));
        }
        self.rwset.put(key, value);
        Ok(())
    }

    async fn delete_state(&mut self, key: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("key must not be empty".to_string()));
        }
        self.rwset.delete(key);
        Ok(())
    }

    async fn get_history_for_key(&mut self, key: &str) -> Result<HistoryStream, StoreError> {
        let entries: Vec<Result<HistoryEntry, StoreError>> = self
            .state
            .read()
            .history
            .get(key)
            .map(|h| h.iter().rev().cloned().map(Ok).collect())
            .unwrap_or_default();
        Ok(Box::pin(tokio_stream::iter(entries)))
    }

    async fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[String],
    ) -> Result<QueryStream, StoreError> {
        let prefix = partial_composite_key(object_type, attributes)
            .map_err(|e| StoreError::InvalidKey(e.to_string()))?;

        let (records, observed): (Vec<_>, Vec<_>) = self
            .state
            .read()
            .range(&prefix)
            .map(|(k, v)| {
                (
                    Ok(QueryRecord {
                        key: k.clone(),
                        value: v.value.clone(),
                    }),
                    (k.clone(), v.version),
                )
            })
            .unzip();

        self.rwset.record_range(RangeRead { prefix, observed });
        Ok(Box::pin(tokio_stream::iter(records)))
    }

    async fn get_query_result(&mut self, query: &str) -> Result<QueryStream, StoreError> {
        let selector = Selector::parse(query)?;
        let records: Vec<Result<QueryRecord, StoreError>> = self
            .state
            .read()
            .values
            .iter()
            .filter_map(|(k, v)| {
                selector.evaluate(&v.value).map(|value| {
                    Ok(QueryRecord {
                        key: k.clone(),
                        value,
                    })
                })
            })
            .collect();
        Ok(Box::pin(tokio_stream::iter(records)))
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StoreError> {
        if name.is_empty() {
            return Err(StoreError::InvalidEvent(
                "event name must not be empty".to_string(),
            ));
        }
        self.event = Some(ChaincodeEvent {
            topic: name.to_string(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{collect_history, collect_records, create_composite_key};

    #[tokio::test]
    async fn test_put_then_get_after_commit() {
        let ledger = InMemoryLedger::new();

        let mut tx = ledger.begin("tx-1");
        tx.put_state("k", b"v1".to_vec()).await.unwrap();
        // Own writes are not visible before commit
        assert_eq!(tx.get_state("k").await.unwrap(), None);
        let receipt = ledger.commit(tx).await.unwrap();
        assert_eq!(receipt.outcome, CommitOutcome::Committed { block_num: 1 });

        let mut tx = ledger.begin("tx-2");
        assert_eq!(tx.get_state("k").await.unwrap(), Some(b"v1".to_vec()));
    }

    #[tokio::test]
    async fn test_dropped_transaction_applies_nothing() {
        let ledger = InMemoryLedger::new();
        {
            let mut tx = ledger.begin("tx-1");
            tx.put_state("k", b"v".to_vec()).await.unwrap();
        }
        assert!(ledger.is_empty());
        assert_eq!(ledger.height(), 0);
    }

    #[tokio::test]
    async fn test_stale_read_aborts_commit() {
        let ledger = InMemoryLedger::new();
        ledger.seed("genesis", [("k", b"0".to_vec())]);

        let mut first = ledger.begin("tx-a");
        let mut second = ledger.begin("tx-b");
        first.get_state("k").await.unwrap();
        second.get_state("k").await.unwrap();
        first.put_state("k", b"1".to_vec()).await.unwrap();
        second.put_state("k", b"2".to_vec()).await.unwrap();

        assert!(ledger.commit(first).await.unwrap().outcome.is_committed());
        let receipt = ledger.commit(second).await.unwrap();
        assert_eq!(
            receipt.outcome,
            CommitOutcome::ConflictAborted { key: "k".into() }
        );
        assert_eq!(ledger.committed_value("k"), Some(b"1".to_vec()));
    }

    #[tokio::test]
    async fn test_event_only_on_commit() {
        let ledger = InMemoryLedger::new();
        let mut tx = ledger.begin("tx-1");
        tx.set_event("first", b"1".to_vec()).unwrap();
        tx.set_event("second", b"2".to_vec()).unwrap();
        tx.put_state("k", b"v".to_vec()).await.unwrap();
        let receipt = ledger.commit(tx).await.unwrap();
        assert_eq!(receipt.event.unwrap().topic, "second");
    }

    #[tokio::test]
    async fn test_empty_event_name_rejected() {
        let ledger = InMemoryLedger::new();
        let mut tx = ledger.begin("tx-1");
        assert!(matches!(
            tx.set_event("", Vec::new()),
            Err(StoreError::InvalidEvent(_))
        ));
    }

    #[tokio::test]
    async fn test_history_most_recent_first() {
        let ledger = InMemoryLedger::new();
        ledger.seed("tx-1", [("k", b"1".to_vec())]);
        ledger.seed("tx-2", [("k", b"2".to_vec())]);
        let mut tx = ledger.begin("tx-3");
        tx.delete_state("k").await.unwrap();
        ledger.commit(tx).await.unwrap();

        let mut reader = ledger.begin("tx-4");
        let stream = reader.get_history_for_key("k").await.unwrap();
        let entries = collect_history(stream).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.tx_id.as_str()).collect();
        assert_eq!(ids, vec!["tx-3", "tx-2", "tx-1"]);
        assert!(entries[0].is_delete);
        assert!(entries[0].sequence > entries[1].sequence);

        let never = reader.get_history_for_key("other").await.unwrap();
        assert!(collect_history(never).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_key_scan_and_phantom() {
        let ledger = InMemoryLedger::new();
        let k1 = create_composite_key("device", &["d1", "10:00"]).unwrap();
        let k2 = create_composite_key("device", &["d1", "11:00"]).unwrap();
        let other = create_composite_key("device", &["d2", "10:00"]).unwrap();
        ledger.seed("genesis", [(k1.clone(), b"{}".to_vec()), (other, b"{}".to_vec())]);

        let mut scanner = ledger.begin("tx-scan");
        let stream = scanner
            .get_state_by_partial_composite_key("device", &["d1".to_string()])
            .await
            .unwrap();
        let records = collect_records(stream).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, k1);
        scanner.put_state("summary", b"1".to_vec()).await.unwrap();

        ledger.seed("tx-insert", [(k2.clone(), b"{}".to_vec())]);

        let receipt = ledger.commit(scanner).await.unwrap();
        assert_eq!(receipt.outcome, CommitOutcome::ConflictAborted { key: k2 });
    }

    #[tokio::test]
    async fn test_rich_query() {
        let ledger = InMemoryLedger::new();
        ledger.seed(
            "genesis",
            [
                ("a", br#"{"docType":"Event","value":"on"}"#.to_vec()),
                ("b", br#"{"docType":"Other"}"#.to_vec()),
                ("c", b"100".to_vec()),
            ],
        );
        let mut tx = ledger.begin("tx-q");
        let stream = tx
            .get_query_result(r#"{"selector":{"docType":"Event"},"fields":["value"]}"#)
            .await
            .unwrap();
        let records = collect_records(stream).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "a");
        assert_eq!(records[0].value, br#"{"value":"on"}"#.to_vec());

        assert!(matches!(
            tx.get_query_result("not json").await,
            Err(StoreError::QueryFailed(_))
        ));
    }
}
