//! Nullable clock: deterministic time for testing.

use alb_types::Timestamp;
use std::cell::Cell;

const DAY_SECS: u64 = 24 * 3600;

/// A clock that only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get().saturating_add(secs));
    }

    pub fn advance_days(&self, days: u64) {
        self.advance(days.saturating_mul(DAY_SECS));
    }

    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}
