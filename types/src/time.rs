//! Timestamp type used by the timelock.
//!
//! Timestamps are Unix epoch seconds as observed by the caller. The
//! controller never reads a clock itself; every time-dependent call takes
//! `now` explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// `self + secs`, clamped at `u64::MAX`.
    pub fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds remaining until `deadline` (zero once reached).
    pub fn secs_until(&self, deadline: Timestamp) -> u64 {
        deadline.0.saturating_sub(self.0)
    }

    /// Whether `deadline` is at or before this timestamp.
    pub fn has_reached(&self, deadline: Timestamp) -> bool {
        self.0 >= deadline.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_add_clamps() {
        assert_eq!(Timestamp::new(u64::MAX - 1).saturating_add(10).as_secs(), u64::MAX);
        assert_eq!(Timestamp::new(5).saturating_add(10).as_secs(), 15);
    }

    #[test]
    fn has_reached_is_inclusive() {
        let deadline = Timestamp::new(100);
        assert!(!Timestamp::new(99).has_reached(deadline));
        assert!(Timestamp::new(100).has_reached(deadline));
        assert!(Timestamp::new(101).has_reached(deadline));
    }

    #[test]
    fn secs_until_saturates() {
        assert_eq!(Timestamp::new(40).secs_until(Timestamp::new(100)), 60);
        assert_eq!(Timestamp::new(140).secs_until(Timestamp::new(100)), 0);
    }
}
