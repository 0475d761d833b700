//! # Domain Entities
//!
//! The deposit record and the read-only views derived from it.

use super::errors::ValueLockError;
use super::value_objects::{
    Address, CustodyHandle, DepositId, Timestamp, Value, WithdrawnBy, MAX_DURATION_MINUTES,
    MS_PER_MINUTE,
};
use serde::{Deserialize, Serialize};

/// A time-locked deposit held for a recipient.
///
/// Immutable once created. It is destroyed, never mutated, when either party
/// withdraws.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// Unique identifier.
    pub id: DepositId,
    /// The locked value.
    pub locked_value: Value,
    /// Ledger handle for the value in custody.
    pub custody: CustodyHandle,
    /// Party that created the lock. May reclaim at any time.
    pub depositor: Address,
    /// Party that may claim once unlocked.
    pub recipient: Address,
    /// Clock reading at creation (ms).
    pub start_time: Timestamp,
    /// Lock duration (ms), a positive multiple of one minute.
    pub duration_ms: u64,
    /// `start_time + duration_ms`.
    pub unlock_time: Timestamp,
}

/// Parameters for creating a deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositParams {
    /// Unique identifier.
    pub id: DepositId,
    /// The value in custody.
    pub value: Value,
    /// Ledger custody handle.
    pub custody: CustodyHandle,
    /// Depositor address.
    pub depositor: Address,
    /// Recipient address.
    pub recipient: Address,
    /// Creation timestamp (ms).
    pub start_time: Timestamp,
    /// Lock duration (ms).
    pub duration_ms: u64,
}

/// Compute the unlock time, rejecting a sum past the end of the clock range.
pub fn compute_unlock_time(
    start_time: Timestamp,
    duration_ms: u64,
) -> Result<Timestamp, ValueLockError> {
    start_time
        .checked_add(duration_ms)
        .ok_or(ValueLockError::DurationTooLong {
            minutes: duration_ms / MS_PER_MINUTE,
            max: MAX_DURATION_MINUTES,
        })
}

impl Deposit {
    /// Create a new deposit record.
    pub fn new(params: DepositParams) -> Result<Self, ValueLockError> {
        let unlock_time = compute_unlock_time(params.start_time, params.duration_ms)?;
        Ok(Self {
            id: params.id,
            locked_value: params.value,
            custody: params.custody,
            depositor: params.depositor,
            recipient: params.recipient,
            start_time: params.start_time,
            duration_ms: params.duration_ms,
            unlock_time,
        })
    }

    /// Whether the recipient may claim at `now`. Inclusive at the boundary.
    pub fn is_unlocked(&self, now: Timestamp) -> bool {
        now >= self.unlock_time
    }

    /// Milliseconds remaining until unlock, zero once unlocked.
    pub fn time_until_unlock(&self, now: Timestamp) -> u64 {
        self.unlock_time.saturating_sub(now)
    }

    /// The address entitled to withdraw as `by`.
    pub fn party(&self, by: WithdrawnBy) -> Address {
        match by {
            WithdrawnBy::Depositor => self.depositor,
            WithdrawnBy::Recipient => self.recipient,
        }
    }

    /// Read-only view at `now`.
    pub fn snapshot(&self, now: Timestamp) -> DepositSnapshot {
        DepositSnapshot {
            depositor: self.depositor,
            recipient: self.recipient,
            locked_value: self.locked_value.clone(),
            start_time: self.start_time,
            duration_ms: self.duration_ms,
            unlock_time: self.unlock_time,
            now,
        }
    }
}

/// Read-only view of a live deposit returned by `get_info`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositSnapshot {
    /// Depositor address.
    pub depositor: Address,
    /// Recipient address.
    pub recipient: Address,
    /// Locked value.
    pub locked_value: Value,
    /// Creation timestamp (ms).
    pub start_time: Timestamp,
    /// Lock duration (ms).
    pub duration_ms: u64,
    /// Unlock timestamp (ms).
    pub unlock_time: Timestamp,
    /// Clock reading when the snapshot was taken.
    pub now: Timestamp,
}

/// A stored deposit together with its store version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedDeposit {
    /// The record.
    pub deposit: Deposit,
    /// Version assigned by the store. Starts at 1.
    pub version: u64,
}

/// Value moved to a party by a successful withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Receiving address.
    pub destination: Address,
    /// Value released from custody.
    pub value: Value,
}
