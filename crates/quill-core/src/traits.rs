//! Core traits for quill abstractions.
//!
//! These define the seams concrete implementations plug into: the
//! key-value backend notes persist to and the clock timestamps come from.

use chrono::Utc;
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::Result;

// =============================================================================
// KEY-VALUE STORE
// =============================================================================

/// Synchronous, string-keyed store of structured values.
///
/// Each `set` replaces the whole value under a key; that is the atomicity
/// unit collections rely on.
pub trait KeyValueStore: Send + Sync {
    /// Read a key. Absent keys are `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    /// Write a key, replacing any previous value.
    fn set(&self, key: &str, value: JsonValue) -> Result<()>;

    /// Delete a key. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Delete every key.
    fn clear_all(&self) -> Result<()>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

// =============================================================================
// CLOCK
// =============================================================================

/// Source of epoch-millisecond timestamps.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2023-11-14, well before any build of this crate
        assert!(SystemClock.now_ms() > 1_700_000_000_000);
    }
}
