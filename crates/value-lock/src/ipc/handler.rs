//! IPC Handler for the value lock
//!
//! ## Security Boundaries
//!
//! - Caller identity is the envelope's `caller`, never a payload field
//! - Envelopes with an unknown protocol version are rejected
//! - Each nonce is accepted once inside the freshness window, so a replayed
//!   create cannot lock value twice

use crate::domain::ValueLockError;
use crate::ipc::payloads::{
    ErrorPayload, LockRequest, LockRequestEnvelope, LockResponse, LockResponseEnvelope,
    PROTOCOL_VERSION,
};
use crate::ports::inbound::ValueLockApi;
use crate::ports::outbound::ClockSource;
use parking_lot::Mutex;
use shared_bus::{NonceError, TimeBoundedNonceCache};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors raised while handling a request envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Envelope version not understood.
    #[error("Unsupported protocol version {got} (expected {expected})")]
    UnsupportedVersion {
        /// Received version
        got: u16,
        /// Supported version
        expected: u16,
    },

    /// Nonce reused or timestamp outside the freshness window.
    #[error("Replay rejected: {0}")]
    Replay(#[from] NonceError),

    /// Request could not be decoded.
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// The engine rejected the operation.
    #[error(transparent)]
    Lock(#[from] ValueLockError),
}

impl HandlerError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion { .. } => "UNSUPPORTED_VERSION",
            Self::Replay(_) => "REPLAY_REJECTED",
            Self::Malformed(_) => "MALFORMED_REQUEST",
            Self::Lock(e) => e.code(),
        }
    }
}

impl From<&HandlerError> for ErrorPayload {
    fn from(err: &HandlerError) -> Self {
        let retryable = match err {
            HandlerError::Lock(e) => e.is_retryable(),
            _ => false,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            retryable,
        }
    }
}

/// IPC handler in front of a [`ValueLockApi`].
pub struct ValueLockHandler<A: ValueLockApi, C: ClockSource> {
    api: A,
    clock: C,
    nonces: Mutex<TimeBoundedNonceCache>,
}

impl<A: ValueLockApi, C: ClockSource> ValueLockHandler<A, C> {
    /// Create a handler. `clock` should be the engine's clock so the
    /// freshness window and unlock checks agree.
    pub fn new(api: A, clock: C) -> Self {
        Self {
            api,
            clock,
            nonces: Mutex::new(TimeBoundedNonceCache::new()),
        }
    }

    /// The wrapped API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Handle one envelope.
    pub fn handle(&self, envelope: LockRequestEnvelope) -> LockResponseEnvelope {
        let correlation_id = envelope.correlation_id;
        let operation = envelope.payload.operation();

        let result = self.dispatch(envelope).map_err(|e| {
            warn!(%correlation_id, operation, code = e.code(), error = %e, "Request rejected");
            ErrorPayload::from(&e)
        });
        if result.is_ok() {
            debug!(%correlation_id, operation, "Request handled");
        }

        LockResponseEnvelope {
            correlation_id,
            result,
        }
    }

    /// Handle a JSON-encoded envelope, returning a JSON-encoded response.
    pub fn handle_json(&self, request: &str) -> Result<String, HandlerError> {
        let response = match serde_json::from_str::<LockRequestEnvelope>(request) {
            Ok(envelope) => self.handle(envelope),
            Err(e) => {
                let err = HandlerError::Malformed(e.to_string());
                warn!(error = %err, "Undecodable request");
                LockResponseEnvelope {
                    correlation_id: Uuid::nil(),
                    result: Err(ErrorPayload::from(&err)),
                }
            }
        };
        serde_json::to_string(&response).map_err(|e| HandlerError::Malformed(e.to_string()))
    }

    fn dispatch(&self, envelope: LockRequestEnvelope) -> Result<LockResponse, HandlerError> {
        if envelope.version != PROTOCOL_VERSION {
            return Err(HandlerError::UnsupportedVersion {
                got: envelope.version,
                expected: PROTOCOL_VERSION,
            });
        }

        let now = self.clock.now_ms();
        self.nonces
            .lock()
            .validate_and_add(envelope.nonce, envelope.timestamp_ms, now)?;

        let caller = envelope.caller;
        let response = match envelope.payload {
            LockRequest::CreateDeposit {
                value,
                recipient,
                duration_minutes,
            } => {
                let (id, event) =
                    self.api
                        .create_deposit(caller, value, recipient, duration_minutes)?;
                LockResponse::Created { id, event }
            }
            LockRequest::WithdrawByDepositor { id } => {
                let (transfer, event) = self.api.withdraw_by_depositor(caller, id)?;
                LockResponse::Withdrawn { transfer, event }
            }
            LockRequest::WithdrawByRecipient { id } => {
                let (transfer, event) = self.api.withdraw_by_recipient(caller, id)?;
                LockResponse::Withdrawn { transfer, event }
            }
            LockRequest::GetInfo { id } => LockResponse::Info {
                snapshot: self.api.get_info(id)?,
            },
            LockRequest::CanRecipientWithdraw { id } => LockResponse::CanRecipientWithdraw {
                allowed: self.api.can_recipient_withdraw(id)?,
            },
            LockRequest::TimeUntilUnlock { id } => LockResponse::TimeUntilUnlock {
                remaining_ms: self.api.time_until_unlock(id)?,
            },
        };
        Ok(response)
    }
}
