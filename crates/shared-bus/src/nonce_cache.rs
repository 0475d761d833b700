//! # Time-Bounded Nonce Cache
//!
//! Replay prevention for request envelopes.
//!
//! - A request timestamp must fall inside `[now - MAX_AGE, now + MAX_FUTURE_SKEW]`
//! - A nonce may be used once inside the validity window
//! - Nonces are garbage-collected after the validity window expires, which
//!   bounds memory
//!
//! All times are milliseconds. The cache never reads a clock itself; callers
//! pass `now_ms` so tests and simulated clocks stay deterministic.

use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors from nonce cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NonceError {
    /// The nonce has already been used (replay attack).
    #[error("Nonce {nonce} has already been used (replay attack)")]
    NonceReused { nonce: Uuid },

    /// The message timestamp is too old.
    #[error("Message timestamp {timestamp} is too old (threshold: {threshold})")]
    MessageTooOld { timestamp: u64, threshold: u64 },

    /// The message timestamp is in the future.
    #[error("Message timestamp {timestamp} is in the future (threshold: {threshold})")]
    MessageFromFuture { timestamp: u64, threshold: u64 },
}

/// Time-bounded cache for replay prevention.
#[derive(Debug)]
pub struct TimeBoundedNonceCache {
    /// Map of nonce -> request timestamp.
    cache: HashMap<Uuid, u64>,

    /// Nonce validity window in milliseconds.
    validity_window_ms: u64,

    /// Last garbage collection time.
    last_gc: u64,

    /// Garbage collection interval in milliseconds.
    gc_interval_ms: u64,
}

impl TimeBoundedNonceCache {
    /// Default validity window: 2x the 60s message window.
    pub const DEFAULT_VALIDITY_WINDOW_MS: u64 = 120_000;

    /// Default garbage collection interval.
    pub const DEFAULT_GC_INTERVAL_MS: u64 = 10_000;

    /// Maximum past age for valid timestamps.
    pub const MAX_AGE_MS: u64 = 60_000;

    /// Maximum future skew for valid timestamps.
    pub const MAX_FUTURE_SKEW_MS: u64 = 10_000;

    /// Create a new nonce cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Self::DEFAULT_VALIDITY_WINDOW_MS, Self::DEFAULT_GC_INTERVAL_MS)
    }

    /// Create a nonce cache with custom settings.
    #[must_use]
    pub fn with_config(validity_window_ms: u64, gc_interval_ms: u64) -> Self {
        Self {
            cache: HashMap::new(),
            validity_window_ms,
            last_gc: 0,
            gc_interval_ms,
        }
    }

    /// Validate the timestamp, then check and record the nonce.
    ///
    /// The timestamp check runs first so every later step is bounded.
    ///
    /// # Errors
    ///
    /// - `NonceError::MessageTooOld` - Timestamp older than 60s
    /// - `NonceError::MessageFromFuture` - Timestamp more than 10s ahead
    /// - `NonceError::NonceReused` - Nonce has been seen before
    pub fn validate_and_add(
        &mut self,
        nonce: Uuid,
        timestamp: u64,
        now_ms: u64,
    ) -> Result<(), NonceError> {
        let min_valid_timestamp = now_ms.saturating_sub(Self::MAX_AGE_MS);
        let max_valid_timestamp = now_ms.saturating_add(Self::MAX_FUTURE_SKEW_MS);

        if timestamp < min_valid_timestamp {
            return Err(NonceError::MessageTooOld {
                timestamp,
                threshold: min_valid_timestamp,
            });
        }

        if timestamp > max_valid_timestamp {
            return Err(NonceError::MessageFromFuture {
                timestamp,
                threshold: max_valid_timestamp,
            });
        }

        if now_ms.saturating_sub(self.last_gc) > self.gc_interval_ms {
            self.garbage_collect(now_ms);
            self.last_gc = now_ms;
        }

        if self.cache.contains_key(&nonce) {
            return Err(NonceError::NonceReused { nonce });
        }

        self.cache.insert(nonce, timestamp);

        Ok(())
    }

    /// Check if a nonce exists without adding it.
    #[must_use]
    pub fn contains(&self, nonce: &Uuid) -> bool {
        self.cache.contains_key(nonce)
    }

    /// Get the number of cached nonces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn garbage_collect(&mut self, now_ms: u64) {
        let expiry_threshold = now_ms.saturating_sub(self.validity_window_ms);
        self.cache.retain(|_, &mut ts| ts > expiry_threshold);
    }
}

impl Default for TimeBoundedNonceCache {
    fn default() -> Self {
        Self::new()
    }
}
