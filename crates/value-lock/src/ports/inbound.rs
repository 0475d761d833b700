//! # Inbound Ports
//!
//! The public API of the value lock engine.

use crate::domain::{Address, DepositId, DepositSnapshot, Transfer, Value, ValueLockError};
use crate::events::{DepositCreated, DepositWithdrawn};
use std::sync::Arc;

/// Value lock API - inbound port.
pub trait ValueLockApi: Send + Sync {
    /// Lock `value` from `caller` for `recipient` for `duration_minutes`.
    fn create_deposit(
        &self,
        caller: Address,
        value: Value,
        recipient: Address,
        duration_minutes: u64,
    ) -> Result<(DepositId, DepositCreated), ValueLockError>;

    /// Depositor reclaims the full value. Allowed at any time.
    fn withdraw_by_depositor(
        &self,
        caller: Address,
        id: DepositId,
    ) -> Result<(Transfer, DepositWithdrawn), ValueLockError>;

    /// Recipient claims the full value once unlocked.
    fn withdraw_by_recipient(
        &self,
        caller: Address,
        id: DepositId,
    ) -> Result<(Transfer, DepositWithdrawn), ValueLockError>;

    /// Snapshot of a live deposit.
    fn get_info(&self, id: DepositId) -> Result<DepositSnapshot, ValueLockError>;

    /// Whether the recipient could withdraw right now.
    fn can_recipient_withdraw(&self, id: DepositId) -> Result<bool, ValueLockError>;

    /// Milliseconds until unlock, zero once unlocked.
    fn time_until_unlock(&self, id: DepositId) -> Result<u64, ValueLockError>;
}

impl<T: ValueLockApi + ?Sized> ValueLockApi for Arc<T> {
    fn create_deposit(
        &self,
        caller: Address,
        value: Value,
        recipient: Address,
        duration_minutes: u64,
    ) -> Result<(DepositId, DepositCreated), ValueLockError> {
        (**self).create_deposit(caller, value, recipient, duration_minutes)
    }

    fn withdraw_by_depositor(
        &self,
        caller: Address,
        id: DepositId,
    ) -> Result<(Transfer, DepositWithdrawn), ValueLockError> {
        (**self).withdraw_by_depositor(caller, id)
    }

    fn withdraw_by_recipient(
        &self,
        caller: Address,
        id: DepositId,
    ) -> Result<(Transfer, DepositWithdrawn), ValueLockError> {
        (**self).withdraw_by_recipient(caller, id)
    }

    fn get_info(&self, id: DepositId) -> Result<DepositSnapshot, ValueLockError> {
        (**self).get_info(id)
    }

    fn can_recipient_withdraw(&self, id: DepositId) -> Result<bool, ValueLockError> {
        (**self).can_recipient_withdraw(id)
    }

    fn time_until_unlock(&self, id: DepositId) -> Result<u64, ValueLockError> {
        (**self).time_until_unlock(id)
    }
}
