//! Monotonic clock adapter.
//!
//! Wraps `std::time::Instant`; readings are the time since the adapter
//! was created, so they start near zero and never go backwards.

use core::time::Duration;
use std::time::Instant;

use crate::app::ports::TimePort;

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
}

impl TimePort for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}
