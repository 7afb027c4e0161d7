use std::fmt;

use chrono::{DateTime, Datelike, Month, Timelike, Weekday};
use chrono_tz::Tz;

use super::reading::RawReading;

/// Meteorological season, southern-hemisphere convention.
///
/// The variant order is the report order (Summer first), which `Ord`
/// relies on for grouped output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Summer, Season::Autumn, Season::Winter, Season::Spring];

    /// Season is a pure function of the calendar month.
    pub fn from_month(month: Month) -> Self {
        match month {
            Month::December | Month::January | Month::February => Season::Summer,
            Month::March | Month::April | Month::May => Season::Autumn,
            Month::June | Month::July | Month::August => Season::Winter,
            Month::September | Month::October | Month::November => Season::Spring,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A [`RawReading`] with calendar features attached.
///
/// Created by the feature deriver once the timestamp has been resolved in
/// the configured time zone; read-only afterwards.
#[derive(Debug, Clone)]
pub struct DerivedReading {
    pub reading: RawReading,
    pub local_time: DateTime<Tz>,
    pub year: i32,
    pub month: Month,
    pub weekday: Weekday,
    pub hour: u32,
    pub season: Season,
}

impl DerivedReading {
    pub fn new(reading: RawReading, local_time: DateTime<Tz>) -> Self {
        let month = Month::try_from(local_time.month() as u8).expect("month ordinal is 1-12");
        Self {
            reading,
            year: local_time.year(),
            month,
            weekday: local_time.weekday(),
            hour: local_time.hour(),
            season: Season::from_month(month),
            local_time,
        }
    }

    pub fn date(&self) -> chrono::NaiveDate {
        self.local_time.date_naive()
    }
}
