//! In-memory ledger adapter
//!
//! Holds custodied value in a vault keyed by handle and tracks released
//! value as per-address balances.

use crate::domain::{format_address, Address, AssetId, CustodyHandle, LedgerError, Value};
use crate::ports::outbound::LedgerAdapter;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

#[derive(Default)]
struct LedgerState {
    next_handle: u64,
    vault: HashMap<CustodyHandle, Value>,
    balances: HashMap<(Address, AssetId), u128>,
    fail_custody: bool,
    fail_release: bool,
}

/// In-memory ledger for testing and embedding.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `custody` calls fail.
    pub fn set_fail_custody(&self, fail: bool) {
        self.state.lock().fail_custody = fail;
    }

    /// Make subsequent `release` calls fail.
    pub fn set_fail_release(&self, fail: bool) {
        self.state.lock().fail_release = fail;
    }

    /// Value released to `address` so far.
    pub fn balance_of(&self, address: &Address, asset: &AssetId) -> u128 {
        self.state
            .lock()
            .balances
            .get(&(*address, asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Total of `asset` currently in custody, saturating at `u128::MAX`.
    pub fn in_custody(&self, asset: &AssetId) -> u128 {
        self.state
            .lock()
            .vault
            .values()
            .filter(|v| &v.asset == asset)
            .fold(0u128, |total, v| total.saturating_add(v.amount))
    }

    /// Number of live custody handles.
    pub fn custody_count(&self) -> usize {
        self.state.lock().vault.len()
    }
}

impl LedgerAdapter for InMemoryLedger {
    fn custody(&self, value: Value) -> Result<CustodyHandle, LedgerError> {
        let mut state = self.state.lock();
        if state.fail_custody {
            return Err(LedgerError::CustodyRejected("ledger unavailable".into()));
        }
        let handle = CustodyHandle(state.next_handle);
        state.next_handle += 1;
        debug!(handle = handle.0, asset = %value.asset, amount = %value.amount, "Value taken into custody");
        state.vault.insert(handle, value);
        Ok(handle)
    }

    fn release(&self, handle: CustodyHandle, destination: Address) -> Result<(), LedgerError> {
        let mut state = self.state.lock();
        if state.fail_release {
            return Err(LedgerError::ReleaseRejected("ledger unavailable".into()));
        }
        let value = state
            .vault
            .get(&handle)
            .cloned()
            .ok_or(LedgerError::UnknownHandle(handle.0))?;
        let key = (destination, value.asset.clone());
        let balance = state.balances.get(&key).copied().unwrap_or(0);
        let credited = balance
            .checked_add(value.amount)
            .ok_or_else(|| LedgerError::ReleaseRejected("balance overflow".into()))?;
        state.balances.insert(key, credited);
        state.vault.remove(&handle);
        debug!(
            handle = handle.0,
            destination = %format_address(&destination),
            amount = %value.amount,
            "Value released from custody"
        );
        Ok(())
    }
}
