//! # Ledger Events
//!
//! The envelope the runtime publishes for each committed contract event.

use serde::{Deserialize, Serialize};
use shared_types::entities::{ChaincodeEvent, TxId};

/// Which family of contracts emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Fungible token ledger (`transfer`, `approve`).
    TokenLedger,
    /// Record-keeping contracts (`set`, `del`, `saveNewEvent`, ...).
    RecordContracts,
    /// All events (no filtering).
    All,
}

/// A contract event, stamped with the transaction that committed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Committing transaction.
    pub tx_id: TxId,
    /// Block the transaction landed in.
    pub block_num: u64,
    /// Name of the contract that emitted the event.
    pub contract: String,
    /// Contract family.
    pub topic: EventTopic,
    /// The recorded event itself.
    pub event: ChaincodeEvent,
}

impl LedgerEvent {
    /// Event name as recorded by the contract.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.event.topic
    }

    /// Decode the JSON payload.
    pub fn payload_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.event.payload)
    }
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Event names to include. Empty means all names.
    pub names: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            names: Vec::new(),
        }
    }

    /// Create a filter for specific event names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: Vec::new(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic);

        let name_match = self.names.is_empty() || self.names.iter().any(|n| n == event.name());

        topic_match && name_match
    }
}

#[cfg(test)]
pub(crate) fn sample_event(topic: EventTopic, name: &str) -> LedgerEvent {
    LedgerEvent {
        tx_id: "tx-1".into(),
        block_num: 1,
        contract: "erc20".into(),
        topic,
        event: ChaincodeEvent {
            topic: name.into(),
            payload: br#"{"from":"alice","to":"bob","amount":30}"#.to_vec(),
        },
    }
}
