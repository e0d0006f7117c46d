//! Wall-clock source for report timestamps.

use chrono::Utc;

/// Source of the current time in milliseconds since the Unix epoch.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// Current wall-clock time.
    fn now_epoch_ms(&self) -> i64;
}

/// Clock backed by the system time.
#[derive(Debug, Default, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
