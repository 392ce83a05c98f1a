//! # Read/Write Sets
//!
//! What a transaction simulation observed and what it intends to write.

use shared_types::entities::Version;
use std::collections::BTreeMap;

/// A buffered mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put(Vec<u8>),
    Delete,
}

/// A range scan and the committed keys it saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRead {
    /// Key prefix that bounded the scan.
    pub prefix: String,
    /// Keys and versions returned, in key order.
    pub observed: Vec<(String, Version)>,
}

/// Read-set, range reads and ordered write-set of one transaction.
#[derive(Debug, Clone, Default)]
pub struct ReadWriteSet {
    reads: BTreeMap<String, Option<Version>>,
    range_reads: Vec<RangeRead>,
    writes: BTreeMap<String, WriteOp>,
}

impl ReadWriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the version observed for `key`. The first observation sticks.
    pub fn record_read(&mut self, key: &str, version: Option<Version>) {
        self.reads.entry(key.to_string()).or_insert(version);
    }

    pub fn record_range(&mut self, range: RangeRead) {
        self.range_reads.push(range);
    }

    /// Buffer a put. Last write to a key wins.
    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        self.writes.insert(key.to_string(), WriteOp::Put(value));
    }

    /// Buffer a delete. Last write to a key wins.
    pub fn delete(&mut self, key: &str) {
        self.writes.insert(key.to_string(), WriteOp::Delete);
    }

    pub fn reads(&self) -> impl Iterator<Item = (&str, Option<Version>)> {
        self.reads.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn range_reads(&self) -> &[RangeRead] {
        &self.range_reads
    }

    /// Writes in key order.
    pub fn writes(&self) -> impl Iterator<Item = (&str, &WriteOp)> {
        self.writes.iter().map(|(k, op)| (k.as_str(), op))
    }

    /// Consume the set, yielding the ordered writes.
    pub fn into_writes(self) -> BTreeMap<String, WriteOp> {
        self.writes
    }

    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}
