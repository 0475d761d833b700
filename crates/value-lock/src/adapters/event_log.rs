//! Append-only in-memory event sink

use crate::events::{DepositCreated, DepositWithdrawn, LockEvent};
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;

/// Records every published event in order.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<LockEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in publication order.
    pub fn events(&self) -> Vec<LockEvent> {
        self.events.read().clone()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing was published.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Creation events only.
    pub fn created(&self) -> Vec<DepositCreated> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                LockEvent::Created(created) => Some(created.clone()),
                LockEvent::Withdrawn(_) => None,
            })
            .collect()
    }

    /// Withdrawal events only.
    pub fn withdrawn(&self) -> Vec<DepositWithdrawn> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                LockEvent::Withdrawn(withdrawn) => Some(withdrawn.clone()),
                LockEvent::Created(_) => None,
            })
            .collect()
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: LockEvent) {
        self.events.write().push(event);
    }
}
