//! # Bus Events
//!
//! The contract an event type must satisfy to travel over the bus, and the
//! filter subscribers use to select what they receive.

use serde::{Deserialize, Serialize};

/// An event that can be published on the bus.
///
/// `topic` groups events for filtering; it should be a stable, lowercase,
/// dot-separated name such as `"deposit.created"`.
pub trait BusEvent: Clone + Send + Sync + 'static {
    /// Topic this event is routed under.
    fn topic(&self) -> &'static str;
}

/// Subscription filter.
///
/// An empty topic list accepts every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches<E: BusEvent>(&self, event: &E) -> bool {
        self.topics.is_empty() || self.topics.iter().any(|t| t == event.topic())
    }

    /// Key used to count subscriptions per filter.
    pub(crate) fn key(&self) -> String {
        if self.topics.is_empty() {
            "*".to_string()
        } else {
            self.topics.join(",")
        }
    }
}
