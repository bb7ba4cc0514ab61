//! Sources of the current time.
//!
//! Monthly totals depend on what "now" is. Passing a [Clock] in instead of
//! reading the system time keeps those calculations reproducible in tests.

use time::OffsetDateTime;

use crate::timezone::LocalTimezone;

/// Provides the current date and time.
pub trait Clock {
    /// The current date and time.
    fn now(&self) -> OffsetDateTime;

    /// The timezone that calendar months are measured in.
    ///
    /// Defaults to the offset of [Clock::now].
    fn timezone(&self) -> LocalTimezone {
        LocalTimezone::Fixed(self.now().offset())
    }
}

/// Reads the system time and reports it in a local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    timezone: LocalTimezone,
}

impl SystemClock {
    /// Create a clock that reports the time in `timezone`.
    pub fn new(timezone: impl Into<LocalTimezone>) -> Self {
        Self {
            timezone: timezone.into(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(time::UtcOffset::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        self.timezone.to_local(OffsetDateTime::now_utc())
    }

    fn timezone(&self) -> LocalTimezone {
        self.timezone
    }
}

/// A clock that is stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: OffsetDateTime,
    timezone: LocalTimezone,
}

impl FixedClock {
    /// A clock stuck at `now`, measuring months in the offset of `now`.
    pub fn new(now: OffsetDateTime) -> Self {
        Self::in_timezone(now, now.offset())
    }

    /// A clock stuck at `now`, measuring months in `timezone`.
    pub fn in_timezone(now: OffsetDateTime, timezone: impl Into<LocalTimezone>) -> Self {
        let timezone = timezone.into();

        Self {
            now: timezone.to_local(now),
            timezone,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.now
    }

    fn timezone(&self) -> LocalTimezone {
        self.timezone
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }

    fn timezone(&self) -> LocalTimezone {
        (**self).timezone()
    }
}
