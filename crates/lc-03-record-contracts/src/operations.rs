//! # Record Operations
//!
//! A record operation is a wire name bound to a generic handler shape and
//! the key layout it works on. Contract presets are tables of these.

use lc_01_world_state::KeySchema;
use serde_json::{json, Map, Value};
use shared_types::errors::Arity;
use std::fmt;

/// How an operation addresses its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    /// One argument used verbatim as the storage key. The string names the
    /// argument in error messages.
    Simple(&'static str),
    /// Several arguments encoded as a composite key.
    Composite(KeySchema),
}

impl RecordKey {
    /// Number of arguments that make up the key.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Simple(_) => 1,
            Self::Composite(schema) => schema.arity(),
        }
    }

    /// Names of the key arguments, in order.
    #[must_use]
    pub fn segment_names(&self) -> Vec<&str> {
        match self {
            Self::Simple(name) => vec![*name],
            Self::Composite(schema) => schema.segment_names().iter().map(String::as_str).collect(),
        }
    }
}

/// A fixed selector query over one document type. Each argument supplies
/// an equality term; `fields` is the projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTemplate {
    /// Required `docType`.
    pub doc_type: &'static str,
    /// Document fields matched against the arguments, in order.
    pub params: &'static [&'static str],
    /// Fields returned for each match.
    pub fields: &'static [&'static str],
}

impl SelectorTemplate {
    /// Selector query for `args`, one per parameter.
    #[must_use]
    pub fn render(&self, args: &[String]) -> String {
        let mut selector = Map::new();
        selector.insert("docType".into(), self.doc_type.into());
        for (field, value) in self.params.iter().zip(args) {
            selector.insert((*field).to_string(), Value::String(value.clone()));
        }
        json!({ "selector": selector, "fields": self.fields }).to_string()
    }
}

/// Handler shape of a record operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// Store `key..., value`; returns the record identifier.
    Put(RecordKey),
    /// Store `key, value`; returns `key:value`.
    PutPair(RecordKey),
    /// Return the raw stored value.
    Get(RecordKey),
    /// Delete; returns the record identifier.
    Delete(RecordKey),
    /// History of the key as JSON.
    History(RecordKey),
    /// `set(k, v, k, v, ...)` with per-pair failures.
    BatchSet,
    /// `get(k, ...)` with per-key failures.
    BatchGet,
    /// `del(k, ...)`.
    BatchDelete,
    /// Records sharing the leading `leading` segments of `schema`.
    Scan {
        /// Key type to scan.
        schema: KeySchema,
        /// Number of leading segments supplied as arguments.
        leading: usize,
    },
    /// Selector query over stored JSON documents.
    Query,
    /// Selector query built from a template.
    Selector(SelectorTemplate),
    /// Store a device event under `schema` and its summary under the
    /// first segment alone.
    DeviceEvent(KeySchema),
    /// `<contract>:<version>`.
    Version,
}

/// A named record operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOperation {
    /// Function name on the wire.
    pub name: &'static str,
    /// Handler shape.
    pub kind: RecordKind,
    /// Event recorded on success, if any.
    pub event: Option<&'static str>,
}

impl RecordOperation {
    /// Operation without an event.
    #[must_use]
    pub fn new(name: &'static str, kind: RecordKind) -> Self {
        Self {
            name,
            kind,
            event: None,
        }
    }

    /// Record `event` when the operation succeeds.
    #[must_use]
    pub fn with_event(mut self, event: &'static str) -> Self {
        self.event = Some(event);
        self
    }

    /// Accepted argument count.
    #[must_use]
    pub fn arity(&self) -> Arity {
        match &self.kind {
            RecordKind::Put(key) | RecordKind::PutPair(key) => Arity::Exact(key.arity() + 1),
            RecordKind::Get(key) | RecordKind::Delete(key) | RecordKind::History(key) => {
                Arity::Exact(key.arity())
            }
            RecordKind::BatchSet | RecordKind::BatchGet | RecordKind::BatchDelete => {
                Arity::AtLeast(1)
            }
            RecordKind::Scan { leading, .. } => Arity::Exact(*leading),
            RecordKind::Query => Arity::Exact(1),
            RecordKind::Selector(template) => Arity::Exact(template.params.len()),
            RecordKind::DeviceEvent(schema) => Arity::Exact(schema.arity() + 1),
            RecordKind::Version => Arity::Exact(0),
        }
    }

    /// Queries never reach commit.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(
            self.kind,
            RecordKind::Get(_)
                | RecordKind::History(_)
                | RecordKind::BatchGet
                | RecordKind::Scan { .. }
                | RecordKind::Query
                | RecordKind::Selector(_)
                | RecordKind::Version
        )
    }

    /// True when `args` is a lone probe argument sent to a write or a
    /// batch read. Such calls are answered without touching the ledger.
    #[must_use]
    pub fn is_probe(&self, args: &[String], probe: &str) -> bool {
        let answers = !self.is_read_only() || self.kind == RecordKind::BatchGet;
        answers && args.len() == 1 && args[0] == probe
    }
}

impl fmt::Display for RecordOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
