//! # Time Sources
//!
//! `SystemTimeSource` for real ledgers, `SequentialTimeSource` for tests and
//! replayable runs.

use crate::domain::Timestamp;
use crate::ports::TimeSource;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::from(Utc::now())
    }
}

/// Deterministic clock: every call advances by a fixed number of seconds.
#[derive(Debug)]
pub struct SequentialTimeSource {
    next: AtomicI64,
    step_secs: i64,
}

impl SequentialTimeSource {
    pub fn new(start_secs: i64, step_secs: i64) -> Self {
        Self {
            next: AtomicI64::new(start_secs),
            step_secs,
        }
    }
}

impl Default for SequentialTimeSource {
    fn default() -> Self {
        // 2020-01-01T00:00:00Z, one minute apart
        Self::new(1_577_836_800, 60)
    }
}

impl TimeSource for SequentialTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.next.fetch_add(self.step_secs, Ordering::SeqCst), 0)
    }
}
