//! # Domain Errors
//!
//! Every error aborts the whole operation with no partial state change.

use super::value_objects::{Address, DepositId};
use thiserror::Error;

/// Errors raised by the custody substrate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The handle does not name value currently in custody.
    #[error("Custody handle {0} not found")]
    UnknownHandle(u64),

    /// The ledger refused to take custody.
    #[error("Custody rejected: {0}")]
    CustodyRejected(String),

    /// The ledger refused to release value.
    #[error("Release rejected: {0}")]
    ReleaseRejected(String),
}

/// Value lock error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueLockError {
    /// Lock duration was zero.
    #[error("Invalid duration: lock duration must be at least one minute")]
    InvalidDuration,

    /// Lock duration exceeds the configured maximum.
    #[error("Duration too long: {minutes} minutes exceeds maximum of {max}")]
    DurationTooLong {
        /// Requested duration in minutes
        minutes: u64,
        /// Maximum allowed duration in minutes
        max: u64,
    },

    /// Recipient equals depositor.
    #[error("Invalid recipient: recipient must differ from depositor")]
    InvalidRecipient,

    /// Value to lock has zero quantity.
    #[error("Invalid amount: locked value must be greater than zero")]
    InvalidAmount,

    /// Caller is not the party allowed to perform this withdrawal.
    #[error("Unauthorized caller 0x{}", hex::encode(.caller))]
    Unauthorized {
        /// The rejected caller
        caller: Address,
    },

    /// Recipient withdrawal attempted before the unlock time.
    #[error("Too early: unlocks at {unlock_time}, now {now}")]
    TooEarly {
        /// Clock reading at the attempt
        now: u64,
        /// Unlock time of the deposit
        unlock_time: u64,
    },

    /// No live deposit with this id.
    #[error("Deposit not found: {0}")]
    NotFound(DepositId),

    /// The record changed or was consumed since it was read.
    #[error("Version conflict on deposit {id}: expected version {expected}, found {found}")]
    VersionConflict {
        /// Deposit id
        id: DepositId,
        /// Version the caller read
        expected: u64,
        /// Version currently in the store
        found: u64,
    },

    /// The store already holds (or once held) a record with this id.
    #[error("Duplicate deposit id: {0}")]
    DuplicateDeposit(DepositId),

    /// Custody or release refused by the ledger.
    #[error("Ledger failure: {0}")]
    Ledger(#[from] LedgerError),
}

impl ValueLockError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDuration => "INVALID_DURATION",
            Self::DurationTooLong { .. } => "DURATION_TOO_LONG",
            Self::InvalidRecipient => "INVALID_RECIPIENT",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::TooEarly { .. } => "TOO_EARLY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",
            Self::DuplicateDeposit(_) => "DUPLICATE_DEPOSIT",
            Self::Ledger(_) => "LEDGER_FAILURE",
        }
    }

    /// Whether the identical call may succeed later without changed input.
    ///
    /// `TooEarly` clears once the unlock time passes; ledger failures may be
    /// transient. A `VersionConflict` means the record is gone for good.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TooEarly { .. } | Self::Ledger(_))
    }
}
