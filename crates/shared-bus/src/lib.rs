//! # Shared Bus - Committed Event Delivery
//!
//! Contracts record at most one event per transaction. The runtime hands
//! that event to this bus only after the transaction commits; aborted or
//! failed transactions never reach subscribers.
//!
//! ```text
//! ┌──────────────┐  commit ok   ┌──────────────┐  subscribe()  ┌────────────┐
//! │   Runtime    │ ───────────▶ │  Event Bus   │ ────────────▶ │ Subscriber │
//! └──────────────┘  publish()   └──────────────┘               └────────────┘
//! ```
//!
//! Delivery is best effort. A publish with no live subscribers drops the
//! event and is logged, never surfaced to the contract caller.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before older ones are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
