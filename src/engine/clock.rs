//! Clock abstraction.
//!
//! The engine never reads the system time directly; every "now" comes
//! through a [`Clock`] so tests and replays can pin the instant.

use chrono::{NaiveDateTime, TimeDelta, Utc};
use parking_lot::Mutex;

/// Source of the current UTC instant.
pub trait Clock: Send + Sync {
    /// The current instant, naive UTC.
    fn now_utc(&self) -> NaiveDateTime;
}

/// Wall clock backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// A settable clock for tests and deterministic replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Creates a clock pinned to `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        FixedClock { now: Mutex::new(now) }
    }

    /// Repins the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward (or back, with a negative delta).
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock();
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
