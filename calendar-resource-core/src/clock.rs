//! Time source used to decide whether an event is happening.
//!
//! Resolution never reads the wall clock directly. Verbs receive a `Clock`
//! so tests can pin "now" to a fixed instant.

use chrono::{DateTime, FixedOffset, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// True iff `now` lies strictly between `start` and `end`.
    /// An event exactly at either boundary is not happening.
    fn is_happening(&self, start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> bool {
        let now = self.now();
        now > *start && now < *end
    }
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new<Tz: chrono::TimeZone>(instant: DateTime<Tz>) -> Self {
        FixedClock(instant.with_timezone(&Utc))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
