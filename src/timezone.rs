//! Timezone lookup for deciding where days and months begin.

use time::{Date, Duration, OffsetDateTime, UtcOffset};
use time_tz::{Offset, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::Error;

/// The timezone that calendar days and months are measured in.
///
/// A named timezone can change its offset during the year (daylight saving
/// time), so the offset is looked up for each instant rather than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTimezone {
    /// The same offset all year round.
    Fixed(UtcOffset),
    /// A timezone from the IANA database, e.g. "Pacific/Auckland".
    Named(&'static Tz),
}

impl LocalTimezone {
    /// The UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        match self {
            LocalTimezone::Fixed(offset) => *offset,
            LocalTimezone::Named(tz) => tz.get_offset_utc(&instant).to_utc(),
        }
    }

    /// `instant` as a local date and time.
    pub fn to_local(&self, instant: OffsetDateTime) -> OffsetDateTime {
        instant.to_offset(self.offset_at(instant))
    }

    /// The first instant of the local day `date`.
    ///
    /// If midnight happens twice the earlier one is used. If midnight is
    /// skipped the day starts at the transition.
    pub fn start_of_day(&self, date: Date) -> OffsetDateTime {
        let midnight = date.midnight();

        let tz = match self {
            LocalTimezone::Fixed(offset) => return midnight.assume_offset(*offset),
            LocalTimezone::Named(tz) => *tz,
        };

        match midnight.assume_timezone(tz) {
            OffsetResult::Some(start) => start,
            OffsetResult::Ambiguous(first, second) => first.min(second),
            OffsetResult::None => {
                let day_before = midnight
                    .assume_utc()
                    .checked_sub(Duration::days(1))
                    .unwrap_or(midnight.assume_utc());

                midnight.assume_offset(tz.get_offset_utc(&day_before).to_utc())
            }
        }
    }
}

impl From<UtcOffset> for LocalTimezone {
    fn from(offset: UtcOffset) -> Self {
        LocalTimezone::Fixed(offset)
    }
}

/// Get a timezone from its canonical name, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns [Error::InvalidTimezone] if `canonical_timezone` is not a known timezone.
pub fn get_local_timezone(canonical_timezone: &str) -> Result<LocalTimezone, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(LocalTimezone::Named)
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
}
