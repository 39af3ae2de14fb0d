//! Wall-clock source used for timestamps and date rotation

use chrono::{DateTime, Duration, Local};
use parking_lot::Mutex;

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A manually driven clock, for deterministic rotation
///
/// ```
/// use chrono::{Local, TimeZone};
/// use rust_structured_logger::core::{Clock, FixedClock};
///
/// let clock = FixedClock::new(Local.with_ymd_and_hms(2025, 11, 17, 9, 0, 0).unwrap());
/// clock.advance(chrono::Duration::days(1));
/// assert_eq!(clock.now().format("%Y-%m-%d").to_string(), "2025-11-18");
/// ```
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}
