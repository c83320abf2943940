//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 in UTC.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
