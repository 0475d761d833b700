//! # IPC Module
//!
//! Envelope-based request handling for the engine.
//!
//! ## Security
//!
//! - Caller identity comes from the envelope only
//! - Replays are rejected by a time-bounded nonce cache

pub mod handler;
pub mod payloads;

pub use handler::{HandlerError, ValueLockHandler};
pub use payloads::{
    ErrorPayload, LockRequest, LockRequestEnvelope, LockResponse, LockResponseEnvelope,
    PROTOCOL_VERSION,
};
