//! # Event Subscriber
//!
//! Defines the subscription side of the event bus.

use crate::events::{BusEvent, EventFilter};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("Event bus closed")]
    Closed,
}

/// Decrements the bus's subscription count when the last holder drops.
struct SubscriptionGuard {
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    key: String,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        if let Some(count) = subs.get_mut(&self.key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                subs.remove(&self.key);
            }
        }
        debug!(filter = %self.key, "Subscription dropped");
    }
}

/// A subscription handle for receiving events.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription<E: BusEvent> {
    receiver: broadcast::Receiver<E>,
    filter: EventFilter,
    guard: SubscriptionGuard,
}

impl<E: BusEvent> Subscription<E> {
    pub(crate) fn new(
        receiver: broadcast::Receiver<E>,
        filter: EventFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
        key: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            guard: SubscriptionGuard { subscriptions, key },
        }
    }

    /// Receive the next event that matches the filter.
    ///
    /// Returns `None` once the bus has been dropped.
    pub async fn recv(&mut self) -> Option<E> {
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

    /// Try to receive the next matching event without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was available and matched
    /// - `Ok(None)` - Nothing buffered right now
    /// - `Err(SubscriptionError::Closed)` - The bus was dropped
    pub fn try_recv(&mut self) -> Result<Option<E>, SubscriptionError> {
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

    /// Drain every matching event currently buffered.
    pub fn drain(&mut self) -> Vec<E> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Convert into a `Stream` of matching events.
    #[must_use]
    pub fn into_stream(self) -> EventStream<E> {
        EventStream {
            inner: BroadcastStream::new(self.receiver),
            filter: self.filter,
            _guard: self.guard,
        }
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct EventStream<E: BusEvent> {
    inner: BroadcastStream<E>,
    filter: EventFilter,
    _guard: SubscriptionGuard,
}

impl<E: BusEvent> EventStream<E> {
    /// Create a new event stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription<E>) -> Self {
        subscription.into_stream()
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl<E: BusEvent> Stream for EventStream<E> {
    type Item = E;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    if self.filter.matches(&event) {
                        return Poll::Ready(Some(event));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    debug!(lagged = count, "Stream lagged, some events dropped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
