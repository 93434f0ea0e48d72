//! Monotonic clock adapter.
//!
//! Wraps `std::time::Instant`: timestamps are microseconds since the
//! adapter was created.  Never consults wall-clock time.

use std::time::Instant;

use crate::app::ports::ClockPort;
use crate::fsm::context::Timestamp;

/// Host monotonic clock.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Microseconds since start (monotonic, saturates at `u64::MAX`).
    pub fn uptime_us(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

impl ClockPort for MonotonicClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.uptime_us())
    }
}
