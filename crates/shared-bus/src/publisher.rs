//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use crate::events::{BusEvent, EventFilter};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing events to the bus.
///
/// Publishing never blocks and never fails: an event with no live
/// subscriber is counted and dropped.
pub trait EventPublisher<E: BusEvent>: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the event.
    fn publish(&self, event: E) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the event bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer semantics.
/// `broadcast::Sender::send` is synchronous, so producers need no runtime.
pub struct InMemoryEventBus<E: BusEvent> {
    /// Broadcast sender for events.
    sender: broadcast::Sender<E>,

    /// Active subscription count by filter key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl<E: BusEvent> InMemoryEventBus<E> {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// Only events published after this call are delivered.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription<E> {
        let receiver = self.sender.subscribe();
        let key = filter.key();

        if let Ok(mut subs) = self.subscriptions.write() {
            *subs.entry(key.clone()).or_insert(0) += 1;
        }

        debug!(topics = ?filter.topics, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), key)
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream<E> {
        EventStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Number of live subscriptions registered under a filter.
    #[must_use]
    pub fn subscriptions_for(&self, filter: &EventFilter) -> usize {
        self.subscriptions
            .read()
            .map(|subs| subs.get(&filter.key()).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<E: BusEvent> Default for InMemoryEventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> EventPublisher<E> for InMemoryEventBus<E> {
    fn publish(&self, event: E) -> usize {
        let topic = event.topic();

        // Count every attempt, delivered or not
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(topic, receivers = receiver_count, "Event published");
                receiver_count
            }
            Err(_) => {
                warn!(topic, "Event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
