// System clock adapter - Wall-clock time for output names

use chrono::Utc;

use crate::ports::ClockPort;

/// Reads the real wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn unix_timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }
}
