//! Timestamps and the clock abstraction.
//!
//! Timestamps are Unix epoch seconds (UTC). Staleness arithmetic saturates
//! so records created on a skewed clock never panic the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

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

    /// Seconds elapsed between this timestamp and `now` (zero if in the future).
    pub fn age_at(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this timestamp is at least `ttl_secs` old relative to `now`.
    pub fn older_than(&self, ttl_secs: u64, now: Timestamp) -> bool {
        self.age_at(now) >= ttl_secs
    }

    /// This timestamp shifted forward by `secs`.
    pub fn plus(&self, secs: u64) -> Timestamp {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time.
///
/// Every component that reasons about staleness takes a `Clock` instead of
/// calling the system time directly, so tests can drive time explicitly.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Timestamp::new(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_is_zero_for_future_timestamps() {
        let ts = Timestamp::new(100);
        assert_eq!(ts.age_at(Timestamp::new(50)), 0);
        assert_eq!(ts.age_at(Timestamp::new(100)), 0);
        assert_eq!(ts.age_at(Timestamp::new(160)), 60);
    }

    #[test]
    fn older_than_is_inclusive() {
        let ts = Timestamp::new(100);
        assert!(!ts.older_than(30, Timestamp::new(129)));
        assert!(ts.older_than(30, Timestamp::new(130)));
    }

    #[test]
    fn plus_saturates() {
        assert_eq!(Timestamp::new(u64::MAX).plus(10), Timestamp::new(u64::MAX));
        assert_eq!(Timestamp::new(5).plus(10), Timestamp::new(15));
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now().as_secs() > 1_577_836_800);
    }
}
