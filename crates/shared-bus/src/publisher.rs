//! # Event Publisher
//!
//! Publishing side of the bus. Called by the runtime after a successful
//! commit, never before.

use crate::events::{EventFilter, LedgerEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing committed events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// Returns the number of active subscribers that received the event.
    async fn publish(&self, event: LedgerEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory event bus built on `tokio::sync::broadcast`.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<LedgerEvent>,

    /// Active subscription count by filter key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    events_published: AtomicU64,

    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let filter_key = format!("{:?}/{:?}", filter.topics, filter.names);

        *self
            .subscriptions
            .write()
            .entry(filter_key.clone())
            .or_insert(0) += 1;

        debug!(topics = ?filter.topics, names = ?filter.names, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), filter_key)
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LedgerEvent) -> usize {
        let name = event.name().to_string();
        let tx_id = event.tx_id.clone();

        // Counted even when nobody is listening
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    event = %name,
                    tx_id = %tx_id,
                    receivers = receiver_count,
                    "Event published"
                );
                receiver_count
            }
            Err(e) => {
                warn!(
                    event = %name,
                    tx_id = %tx_id,
                    error = %e,
                    "Event dropped (no receivers)"
                );
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
