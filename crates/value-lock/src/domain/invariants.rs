//! # Domain Invariants
//!
//! Business rules for deposit creation and withdrawal.

use super::entities::Deposit;
use super::errors::ValueLockError;
use super::value_objects::{
    minutes_to_ms, Address, Timestamp, Value, WithdrawnBy, MAX_DURATION_MINUTES, MS_PER_MINUTE,
};

/// Invariant: Lock lasts at least one minute.
pub fn invariant_duration_positive(duration_minutes: u64) -> Result<(), ValueLockError> {
    if duration_minutes == 0 {
        return Err(ValueLockError::InvalidDuration);
    }
    Ok(())
}

/// Invariant: Lock does not exceed `max_minutes`.
pub fn invariant_duration_bounded(
    duration_minutes: u64,
    max_minutes: u64,
) -> Result<u64, ValueLockError> {
    let too_long = ValueLockError::DurationTooLong {
        minutes: duration_minutes,
        max: max_minutes,
    };
    if duration_minutes > max_minutes {
        return Err(too_long);
    }
    minutes_to_ms(duration_minutes).ok_or(too_long)
}

/// Invariant: Depositor and recipient are distinct.
pub fn invariant_distinct_parties(
    depositor: &Address,
    recipient: &Address,
) -> Result<(), ValueLockError> {
    if depositor == recipient {
        return Err(ValueLockError::InvalidRecipient);
    }
    Ok(())
}

/// Invariant: Locked quantity is positive.
pub fn invariant_positive_amount(value: &Value) -> Result<(), ValueLockError> {
    if value.is_zero() {
        return Err(ValueLockError::InvalidAmount);
    }
    Ok(())
}

/// Check creation inputs in order, returning the duration in milliseconds.
///
/// Duration is checked before recipient, recipient before amount. The first
/// failing rule determines the error.
pub fn validate_creation(
    depositor: &Address,
    recipient: &Address,
    value: &Value,
    duration_minutes: u64,
    max_minutes: u64,
) -> Result<u64, ValueLockError> {
    invariant_duration_positive(duration_minutes)?;
    let duration_ms = invariant_duration_bounded(duration_minutes, max_minutes)?;
    invariant_distinct_parties(depositor, recipient)?;
    invariant_positive_amount(value)?;
    Ok(duration_ms)
}

/// Invariant: Only the matching party may withdraw.
pub fn invariant_authorized(
    deposit: &Deposit,
    caller: &Address,
    by: WithdrawnBy,
) -> Result<(), ValueLockError> {
    if deposit.party(by) != *caller {
        return Err(ValueLockError::Unauthorized { caller: *caller });
    }
    Ok(())
}

/// Invariant: Recipient withdrawal only at or after unlock.
pub fn invariant_unlocked(deposit: &Deposit, now: Timestamp) -> Result<(), ValueLockError> {
    if !deposit.is_unlocked(now) {
        return Err(ValueLockError::TooEarly {
            now,
            unlock_time: deposit.unlock_time,
        });
    }
    Ok(())
}

/// Invariant: A stored record is internally consistent.
pub fn invariant_record_consistent(deposit: &Deposit) -> bool {
    deposit.depositor != deposit.recipient
        && !deposit.locked_value.is_zero()
        && deposit.duration_ms >= MS_PER_MINUTE
        && deposit.duration_ms % MS_PER_MINUTE == 0
        && deposit.duration_ms / MS_PER_MINUTE <= MAX_DURATION_MINUTES
        && deposit.start_time.checked_add(deposit.duration_ms) == Some(deposit.unlock_time)
}
