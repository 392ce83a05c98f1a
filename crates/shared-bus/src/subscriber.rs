//! # Event Subscriber
//!
//! Receiving side of the bus.

use crate::events::{EventFilter, LedgerEvent};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("Event bus closed")]
    Closed,
}

/// Anything that can hand out subscriptions.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe to events matching a filter.
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

impl EventSubscriber for crate::publisher::InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        Self::subscribe(self, filter)
    }
}

/// A subscription handle. Cleaned up on drop.
pub struct Subscription {
    receiver: broadcast::Receiver<LedgerEvent>,
    filter: EventFilter,
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    filter_key: String,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<LedgerEvent>,
        filter: EventFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
        filter_key: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            subscriptions,
            filter_key,
        }
    }

    /// Receive the next event that matches the filter.
    ///
    /// Returns `None` once the bus has been dropped.
    pub async fn recv(&mut self) -> Option<LedgerEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some events dropped");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Try to receive the next matching event without blocking.
    pub fn try_recv(&mut self) -> Result<Option<LedgerEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut subs = self.subscriptions.write();
        if let Some(count) = subs.get_mut(&self.filter_key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                subs.remove(&self.filter_key);
            }
        }
        debug!(filter = %self.filter_key, "Subscription dropped");
    }
}

/// A `tokio_stream::Stream` over a subscription.
pub struct EventStream {
    subscription: Subscription,
}

impl EventStream {
    /// Create a new event stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        self.subscription.filter()
    }
}

impl Stream for EventStream {
    type Item = LedgerEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.subscription.try_recv() {
            Ok(Some(event)) => Poll::Ready(Some(event)),
            Ok(None) => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Err(SubscriptionError::Closed) => Poll::Ready(None),
        }
    }
}
