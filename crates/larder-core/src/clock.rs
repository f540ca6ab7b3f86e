//! # Clock
//!
//! Injected time source.
//!
//! ## Why Inject Time?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Lazy Expiry Strategy                                │
//! │                                                                         │
//! │  There is NO background sweep deleting expired pairing codes.          │
//! │  Expiry is a pure comparison at join time:                             │
//! │                                                                         │
//! │      join_by_code("AB12CD")                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │      clock.now() >= code.expires_at ?                                  │
//! │           │                                                             │
//! │           ├── yes → PairingCodeExpired                                 │
//! │           └── no  → installation_id                                    │
//! │                                                                         │
//! │  Tests pin the clock to an exact instant and walk it across the        │
//! │  expiry boundary without sleeping.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Supplies the current time to the pairing coordinator.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually controlled clock for tests.
///
/// Clones share the same instant, so a test can hand a clone to a service and
/// keep steering time from outside.
///
/// ## Usage
/// ```rust
/// use larder_core::clock::{Clock, FixedClock};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
/// let clock = FixedClock::new(start);
/// clock.advance(Duration::minutes(15));
/// assert_eq!(clock.now(), start + Duration::minutes(15));
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    /// Creates a clock pinned to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        FixedClock {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }

    /// Pins the clock to a new instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_advances() {
        let start = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);

        assert_eq!(clock.now(), start);

        clock.advance(Duration::minutes(15));
        assert_eq!(clock.now(), start + Duration::minutes(15));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
