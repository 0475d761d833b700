//! IPC Payloads for the value lock
//!
//! Requests carry no identity fields. The caller is taken from the envelope.

use crate::domain::{Address, DepositId, DepositSnapshot, Transfer, Value};
use crate::events::{DepositCreated, DepositWithdrawn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current envelope protocol version.
pub const PROTOCOL_VERSION: u16 = 1;

/// Authenticated request wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRequestEnvelope {
    /// Protocol version.
    pub version: u16,
    /// Authenticated caller address.
    pub caller: Address,
    /// Echoed in the response.
    pub correlation_id: Uuid,
    /// Replay-protection nonce.
    pub nonce: Uuid,
    /// Sender timestamp (ms).
    pub timestamp_ms: u64,
    /// The request.
    pub payload: LockRequest,
}

impl LockRequestEnvelope {
    /// Wrap `payload` with fresh correlation id and nonce.
    pub fn new(caller: Address, timestamp_ms: u64, payload: LockRequest) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            caller,
            correlation_id: Uuid::new_v4(),
            nonce: Uuid::new_v4(),
            timestamp_ms,
            payload,
        }
    }
}

/// Engine requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LockRequest {
    /// Lock value for a recipient.
    CreateDeposit {
        /// Value to lock
        value: Value,
        /// Beneficiary
        recipient: Address,
        /// Lock length in minutes
        duration_minutes: u64,
    },
    /// Depositor reclaim.
    WithdrawByDepositor {
        /// Deposit id
        id: DepositId,
    },
    /// Recipient claim.
    WithdrawByRecipient {
        /// Deposit id
        id: DepositId,
    },
    /// Snapshot query.
    GetInfo {
        /// Deposit id
        id: DepositId,
    },
    /// Unlock query.
    CanRecipientWithdraw {
        /// Deposit id
        id: DepositId,
    },
    /// Remaining lock time query.
    TimeUntilUnlock {
        /// Deposit id
        id: DepositId,
    },
}

impl LockRequest {
    /// Operation name for logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::CreateDeposit { .. } => "create_deposit",
            Self::WithdrawByDepositor { .. } => "withdraw_by_depositor",
            Self::WithdrawByRecipient { .. } => "withdraw_by_recipient",
            Self::GetInfo { .. } => "get_info",
            Self::CanRecipientWithdraw { .. } => "can_recipient_withdraw",
            Self::TimeUntilUnlock { .. } => "time_until_unlock",
        }
    }
}

/// Successful results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LockResponse {
    /// Deposit created.
    Created {
        /// New deposit id
        id: DepositId,
        /// Creation event
        event: DepositCreated,
    },
    /// Deposit withdrawn.
    Withdrawn {
        /// Value moved
        transfer: Transfer,
        /// Withdrawal event
        event: DepositWithdrawn,
    },
    /// Deposit snapshot.
    Info {
        /// Snapshot at handling time
        snapshot: DepositSnapshot,
    },
    /// Recipient withdrawal availability.
    CanRecipientWithdraw {
        /// True once unlocked
        allowed: bool,
    },
    /// Remaining lock time.
    TimeUntilUnlock {
        /// Milliseconds until unlock
        remaining_ms: u64,
    },
}

/// Error reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Whether the identical request may succeed later.
    pub retryable: bool,
}

/// Response wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockResponseEnvelope {
    /// Copied from the request, nil if the request could not be decoded.
    pub correlation_id: Uuid,
    /// Outcome.
    pub result: Result<LockResponse, ErrorPayload>,
}

impl LockResponseEnvelope {
    /// True if the request succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Error code, if the request failed.
    pub fn error_code(&self) -> Option<&str> {
        self.result.as_ref().err().map(|e| e.code.as_str())
    }
}
