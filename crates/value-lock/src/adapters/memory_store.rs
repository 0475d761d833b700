//! In-memory deposit store
//!
//! Live records sit in one map. Finalization moves an id into a tombstone map
//! that keeps only its last version and outcome, so consumed ids are never
//! reused and late finalizers see a version conflict. Tombstones are never
//! evicted: the store grows by one small entry per deposit ever created.

use crate::domain::{Deposit, DepositId, LockState, ValueLockError, VersionedDeposit};
use crate::ports::outbound::DepositStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tombstone {
    version: u64,
    outcome: LockState,
}

#[derive(Default)]
struct Slots {
    live: HashMap<DepositId, VersionedDeposit>,
    consumed: HashMap<DepositId, Tombstone>,
}

impl Slots {
    fn contains(&self, id: &DepositId) -> bool {
        self.live.contains_key(id) || self.consumed.contains_key(id)
    }
}

/// Thread-safe in-memory deposit store.
#[derive(Default)]
pub struct InMemoryDepositStore {
    slots: RwLock<Slots>,
}

impl InMemoryDepositStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids ever inserted, live or consumed.
    pub fn len(&self) -> usize {
        let slots = self.slots.read();
        slots.live.len() + slots.consumed.len()
    }

    /// True if nothing was ever inserted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of consumed ids retained as tombstones.
    pub fn consumed_count(&self) -> usize {
        self.slots.read().consumed.len()
    }
}

impl DepositStore for InMemoryDepositStore {
    fn insert(&self, deposit: Deposit) -> Result<u64, ValueLockError> {
        let mut slots = self.slots.write();
        if slots.contains(&deposit.id) {
            return Err(ValueLockError::DuplicateDeposit(deposit.id));
        }
        let id = deposit.id;
        slots.live.insert(id, VersionedDeposit { deposit, version: 1 });
        trace!(deposit_id = %id, "Deposit stored");
        Ok(1)
    }

    fn get(&self, id: &DepositId) -> Result<VersionedDeposit, ValueLockError> {
        self.slots
            .read()
            .live
            .get(id)
            .cloned()
            .ok_or(ValueLockError::NotFound(*id))
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
        let mut slots = self.slots.write();
        if let Some(tombstone) = slots.consumed.get(id) {
            return Err(ValueLockError::VersionConflict {
                id: *id,
                expected: expected_version,
                found: tombstone.version,
            });
        }
        let current = slots.live.get(id).ok_or(ValueLockError::NotFound(*id))?;
        if current.version != expected_version || !LockState::Active.can_transition_to(outcome) {
            return Err(ValueLockError::VersionConflict {
                id: *id,
                expected: expected_version,
                found: current.version,
            });
        }

        commit(&current.deposit)?;

        let consumed = slots.live.remove(id).ok_or(ValueLockError::NotFound(*id))?;
        slots.consumed.insert(
            *id,
            Tombstone {
                version: consumed.version + 1,
                outcome,
            },
        );
        trace!(deposit_id = %id, ?outcome, "Deposit consumed");
        Ok(consumed.deposit)
    }

    fn state(&self, id: &DepositId) -> Option<LockState> {
        let slots = self.slots.read();
        if slots.live.contains_key(id) {
            return Some(LockState::Active);
        }
        slots.consumed.get(id).map(|tombstone| tombstone.outcome)
    }

    fn active_count(&self) -> usize {
        self.slots.read().live.len()
    }
}
