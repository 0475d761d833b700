//! Clock adapters

use crate::domain::Timestamp;
use crate::ports::outbound::ClockSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock in milliseconds.
///
/// Readings never go backwards: if the system clock steps back, the last
/// reported value is repeated until wall time catches up.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    /// Create a new clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClockSource for SystemClock {
    fn now_ms(&self) -> Timestamp {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let previous = self.last.fetch_max(wall, Ordering::SeqCst);
        previous.max(wall)
    }
}

/// Hand-driven clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(ms))
            });
    }

    /// Jump to `time`. Earlier values are ignored.
    pub fn set(&self, time: Timestamp) {
        self.now.fetch_max(time, Ordering::SeqCst);
    }
}

impl ClockSource for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
