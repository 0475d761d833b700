//! # Lock Events
//!
//! Notifications emitted on successful creation and withdrawal. They are
//! published inside the same commit that changes the deposit, so observers
//! never see an event for a change that did not happen.

use crate::domain::{Address, Deposit, DepositId, Timestamp, Value, WithdrawnBy};
use serde::{Deserialize, Serialize};
use shared_bus::BusEvent;

/// Topic for [`LockEvent::Created`].
pub const TOPIC_DEPOSIT_CREATED: &str = "deposit.created";

/// Topic for [`LockEvent::Withdrawn`].
pub const TOPIC_DEPOSIT_WITHDRAWN: &str = "deposit.withdrawn";

/// A deposit was created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositCreated {
    /// Deposit id.
    pub id: DepositId,
    /// Depositor.
    pub depositor: Address,
    /// Recipient.
    pub recipient: Address,
    /// Locked value.
    pub amount: Value,
    /// Creation time (ms).
    pub start_time: Timestamp,
    /// Lock duration (ms).
    pub duration_ms: u64,
    /// Unlock time (ms).
    pub unlock_time: Timestamp,
}

impl From<&Deposit> for DepositCreated {
    fn from(deposit: &Deposit) -> Self {
        Self {
            id: deposit.id,
            depositor: deposit.depositor,
            recipient: deposit.recipient,
            amount: deposit.locked_value.clone(),
            start_time: deposit.start_time,
            duration_ms: deposit.duration_ms,
            unlock_time: deposit.unlock_time,
        }
    }
}

/// A deposit was withdrawn and destroyed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositWithdrawn {
    /// Deposit id.
    pub id: DepositId,
    /// Which party withdrew.
    pub withdrawn_by: WithdrawnBy,
    /// Address that received the value.
    pub withdrawer: Address,
    /// Released value.
    pub amount: Value,
    /// Clock reading at withdrawal (ms).
    pub withdrawn_at: Timestamp,
}

impl DepositWithdrawn {
    /// Build the event for `deposit` withdrawn by `withdrawer` at `now`.
    pub fn new(
        deposit: &Deposit,
        withdrawn_by: WithdrawnBy,
        withdrawer: Address,
        now: Timestamp,
    ) -> Self {
        Self {
            id: deposit.id,
            withdrawn_by,
            withdrawer,
            amount: deposit.locked_value.clone(),
            withdrawn_at: now,
        }
    }
}

/// Events published by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LockEvent {
    /// Deposit created.
    Created(DepositCreated),
    /// Deposit withdrawn.
    Withdrawn(DepositWithdrawn),
}

impl LockEvent {
    /// Deposit this event refers to.
    pub fn deposit_id(&self) -> DepositId {
        match self {
            Self::Created(e) => e.id,
            Self::Withdrawn(e) => e.id,
        }
    }
}

impl BusEvent for LockEvent {
    fn topic(&self) -> &'static str {
        match self {
            Self::Created(_) => TOPIC_DEPOSIT_CREATED,
            Self::Withdrawn(_) => TOPIC_DEPOSIT_WITHDRAWN,
        }
    }
}
