//! # Outbound Ports
//!
//! The engine's injected dependencies: time, custody, notification and
//! record storage. All are synchronous and shared across threads.

use crate::domain::{
    Address, CustodyHandle, Deposit, DepositId, LedgerError, LockState, Timestamp, Value,
    ValueLockError, VersionedDeposit,
};
use crate::events::LockEvent;
use std::sync::Arc;

/// Source of the current time in milliseconds.
///
/// Readings must be non-decreasing across calls.
pub trait ClockSource: Send + Sync {
    /// Current time (ms since epoch).
    fn now_ms(&self) -> Timestamp;
}

/// Custody substrate for locked value.
pub trait LedgerAdapter: Send + Sync {
    /// Take custody of `value`, returning a handle naming it.
    fn custody(&self, value: Value) -> Result<CustodyHandle, LedgerError>;

    /// Release the value behind `handle` to `destination`. Exactly once.
    fn release(&self, handle: CustodyHandle, destination: Address) -> Result<(), LedgerError>;
}

/// Receiver of lock events. Delivery is best-effort and cannot fail the
/// operation that produced the event.
pub trait EventSink: Send + Sync {
    /// Publish an event.
    fn publish(&self, event: LockEvent);
}

/// Versioned deposit storage with compare-and-consume finalization.
pub trait DepositStore: Send + Sync {
    /// Insert a new record at version 1. Fails with `DuplicateDeposit` if
    /// the id was ever used.
    fn insert(&self, deposit: Deposit) -> Result<u64, ValueLockError>;

    /// Fetch a live record. Consumed and unknown ids are `NotFound`.
    fn get(&self, id: &DepositId) -> Result<VersionedDeposit, ValueLockError>;

    /// Consume the record if it is still at `expected_version`.
    ///
    /// `commit` runs while the record is exclusively held. If it fails the
    /// record is left untouched; otherwise the record is replaced by a
    /// tombstone in state `outcome` and the consumed record is returned.
    fn finalize<F>(
        &self,
        id: &DepositId,
        expected_version: u64,
        outcome: LockState,
        commit: F,
    ) -> Result<Deposit, ValueLockError>
    where
        F: FnOnce(&Deposit) -> Result<(), ValueLockError>;

    /// Lifecycle state of `id`, `None` if it never existed.
    fn state(&self, id: &DepositId) -> Option<LockState>;

    /// Number of live records.
    fn active_count(&self) -> usize;
}

impl<T: ClockSource + ?Sized> ClockSource for Arc<T> {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}

impl<T: LedgerAdapter + ?Sized> LedgerAdapter for Arc<T> {
    fn custody(&self, value: Value) -> Result<CustodyHandle, LedgerError> {
        (**self).custody(value)
    }

    fn release(&self, handle: CustodyHandle, destination: Address) -> Result<(), LedgerError> {
        (**self).release(handle, destination)
    }
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: LockEvent) {
        (**self).publish(event)
    }
}

impl<T: DepositStore> DepositStore for Arc<T> {
    fn insert(&self, deposit: Deposit) -> Result<u64, ValueLockError> {
        (**self).insert(deposit)
    }

    fn get(&self, id: &DepositId) -> Result<VersionedDeposit, ValueLockError> {
        (**self).get(id)
    }

    fn finalize<F>(
        &self,
        id: &DepositId,
        expected_version: u64,
        outcome: LockState,
        commit: F,
    ) -> Result<Deposit, ValueLockError>
    where
        F: FnOnce(&Deposit) -> Result<(), ValueLockError>,
    {
        (**self).finalize(id, expected_version, outcome, commit)
    }

    fn state(&self, id: &DepositId) -> Option<LockState> {
        (**self).state(id)
    }

    fn active_count(&self) -> usize {
        (**self).active_count()
    }
}
