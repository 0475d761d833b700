//! # Shared Bus - Event Bus for Lifecycle Notifications
//!
//! Append-only, in-process publication channel. Producers publish and never
//! read back; consumers subscribe with a topic filter.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Producer    │                    │  Indexer /   │
//! │ (lock engine)│    publish()       │  Dashboard   │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! The bus is generic over the event type; anything implementing
//! [`BusEvent`] can be carried.
//!
//! ## Replay Prevention
//!
//! [`TimeBoundedNonceCache`] rejects request nonces seen inside the validity
//! window. It is clock-agnostic: callers pass the current time in.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod nonce_cache;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BusEvent, EventFilter};
pub use nonce_cache::{NonceError, TimeBoundedNonceCache};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging subscribers drop events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
