//! Event sink backed by the shared broadcast bus
//!
//! The bus only reaches subscribers that are live at publish time, so every
//! event is first appended to a journal and then fanned out.

use crate::adapters::InMemoryEventLog;
use crate::events::LockEvent;
use crate::ports::outbound::EventSink;
use shared_bus::{EventPublisher, InMemoryEventBus};
use std::sync::Arc;
use tracing::trace;

/// Journals lock events and forwards them to an [`InMemoryEventBus`].
pub struct BusEventSink {
    journal: Arc<InMemoryEventLog>,
    bus: Arc<InMemoryEventBus<LockEvent>>,
}

impl BusEventSink {
    /// Wrap a bus with a fresh journal.
    pub fn new(bus: Arc<InMemoryEventBus<LockEvent>>) -> Self {
        Self::with_journal(bus, Arc::new(InMemoryEventLog::new()))
    }

    /// Wrap a bus, appending to an existing journal.
    pub fn with_journal(
        bus: Arc<InMemoryEventBus<LockEvent>>,
        journal: Arc<InMemoryEventLog>,
    ) -> Self {
        Self { journal, bus }
    }

    /// The underlying bus.
    pub fn bus(&self) -> &Arc<InMemoryEventBus<LockEvent>> {
        &self.bus
    }

    /// Every event published through this sink, subscribers or not.
    pub fn journal(&self) -> &Arc<InMemoryEventLog> {
        &self.journal
    }
}

impl EventSink for BusEventSink {
    fn publish(&self, event: LockEvent) {
        let deposit_id = event.deposit_id();
        self.journal.publish(event.clone());
        let receivers = self.bus.publish(event);
        trace!(%deposit_id, receivers, "Lock event journaled and forwarded to bus");
    }
}
