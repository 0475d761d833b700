//! # Value Lock
//!
//! Two-party time-locked escrow. A depositor locks fungible value for a
//! recipient; the recipient may claim it only at or after the unlock time,
//! while the depositor may reclaim it at any moment until either party
//! withdraws.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Rules
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Duration `1..=525600` minutes | `validate_creation` |
//! | Recipient differs from depositor | `validate_creation` |
//! | Positive amount | `validate_creation` |
//! | Only the depositor reclaims | `invariant_authorized` |
//! | Recipient claims at or after unlock | `invariant_unlocked` |
//! | At most one withdrawal per deposit | versioned `DepositStore::finalize` |
//!
//! ## Module Structure
//!
//! ```text
//! value-lock/
//! ├── domain/          # Deposit, LockState, invariants, errors
//! ├── ports/           # ValueLockApi, ClockSource, LedgerAdapter, EventSink, DepositStore
//! ├── adapters/        # clocks, in-memory ledger/store, event sinks
//! ├── service.rs       # ValueLockEngine
//! ├── events.rs        # DepositCreated, DepositWithdrawn
//! ├── config.rs        # ValueLockConfig
//! └── ipc/             # envelope handler with replay protection
//! ```
//!
//! ## Example
//!
//! ```
//! use value_lock::{
//!     AssetId, InMemoryDepositStore, InMemoryEventLog, InMemoryLedger, ManualClock,
//!     Value, ValueLockApi, ValueLockEngine,
//! };
//!
//! let engine = ValueLockEngine::new(
//!     ManualClock::new(0),
//!     InMemoryLedger::new(),
//!     InMemoryEventLog::new(),
//!     InMemoryDepositStore::new(),
//! );
//! let (id, _) = engine
//!     .create_deposit([1u8; 20], Value::new(AssetId::new("QNT"), 10), [2u8; 20], 5)
//!     .unwrap();
//! assert_eq!(engine.time_until_unlock(id).unwrap(), 300_000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod ipc;
pub mod ports;
pub mod service;


// Re-exports
pub use adapters::{
    BusEventSink, InMemoryDepositStore, InMemoryEventLog, InMemoryLedger, ManualClock,
    SystemClock,
};
pub use config::{ConfigError, ValueLockConfig};
pub use domain::{
    invariant_authorized, invariant_record_consistent, invariant_unlocked, validate_creation,
    Address, AssetId, CustodyHandle, Deposit, DepositId, DepositSnapshot, LedgerError, LockState,
    Timestamp, Transfer, Value, ValueLockError, VersionedDeposit, WithdrawnBy,
    MAX_DURATION_MINUTES, MAX_DURATION_MS, MS_PER_MINUTE,
};
pub use events::{DepositCreated, DepositWithdrawn, LockEvent};
pub use ipc::{
    ErrorPayload, HandlerError, LockRequest, LockRequestEnvelope, LockResponse,
    LockResponseEnvelope, ValueLockHandler, PROTOCOL_VERSION,
};
pub use ports::{ClockSource, DepositStore, EventSink, LedgerAdapter, ValueLockApi};
pub use service::{EngineStats, ValueLockEngine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
