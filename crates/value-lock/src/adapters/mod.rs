//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports: clocks, an in-memory ledger and
//! deposit store, and event sinks.

mod bus_sink;
mod clock;
mod event_log;
mod memory_ledger;
mod memory_store;

pub use bus_sink::BusEventSink;
pub use clock::{ManualClock, SystemClock};
pub use event_log::InMemoryEventLog;
pub use memory_ledger::InMemoryLedger;
pub use memory_store::InMemoryDepositStore;
