use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::models::{DerivedReading, RawReading, Validity};
use crate::utils::constants::TIMESTAMP_FORMAT;

/// Output of feature derivation.
///
/// `rows` is every reading whose timestamp resolved ("all" population);
/// PM2.5 aggregates are computed from it so readings with a missing PM10
/// still contribute. PM10-dependent aggregates use [`Self::pm10_rows`],
/// the sub-population with a usable PM10 value. The two populations are
/// deliberately kept distinct.
#[derive(Debug)]
pub struct DerivedDataset {
    pub rows: Vec<DerivedReading>,
    /// Rows dropped because the timestamp did not parse or was not a valid
    /// local time in the configured zone.
    pub dropped_timestamps: usize,
    pub negative_pm10: usize,
    pub negative_pm2_5: usize,
}

impl DerivedDataset {
    /// Rows usable for PM10 analysis: PM10 present and non-negative.
    pub fn pm10_rows(&self) -> impl Iterator<Item = &DerivedReading> {
        self.rows
            .iter()
            .filter(|r| r.reading.usable_pm10().is_some())
    }

    pub fn pm10_row_count(&self) -> usize {
        self.pm10_rows().count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last calendar date present, in local time.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|r| r.date()).min()?;
        let last = self.rows.iter().map(|r| r.date()).max()?;
        Some((first, last))
    }
}

/// Parses timestamps in a fixed named time zone and attaches calendar
/// features (year, month, weekday, hour, season).
#[derive(Debug)]
pub struct FeatureDeriver {
    timezone: Tz,
}

impl FeatureDeriver {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Resolve a zone by IANA name. An unknown name is fatal; silently
    /// reinterpreting timestamps in another zone would corrupt every hour
    /// and season derivation downstream.
    pub fn from_zone_name(name: &str) -> Result<Self> {
        let tz = name
            .parse::<Tz>()
            .map_err(|_| ReportError::Timezone(name.to_string()))?;
        Ok(Self::new(tz))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn derive(&self, readings: Vec<RawReading>) -> DerivedDataset {
        let mut rows = Vec::with_capacity(readings.len());
        let mut dropped = 0usize;
        let mut negative_pm10 = 0usize;
        let mut negative_pm2_5 = 0usize;

        for reading in readings {
            let local = match self.parse_local(&reading.timestamp) {
                Some(dt) => dt,
                None => {
                    debug!(timestamp = %reading.timestamp, "dropping row with unparseable timestamp");
                    dropped += 1;
                    continue;
                }
            };

            if reading.pm10_validity() == Validity::Negative {
                negative_pm10 += 1;
            }
            if reading.pm2_5_validity() == Validity::Negative {
                negative_pm2_5 += 1;
            }

            rows.push(DerivedReading::new(reading, local));
        }

        if dropped > 0 {
            warn!(dropped, "dropped rows with unparseable timestamps");
        }
        if negative_pm10 > 0 || negative_pm2_5 > 0 {
            warn!(
                negative_pm10,
                negative_pm2_5, "negative readings present, excluded from all means"
            );
        }

        DerivedDataset {
            rows,
            dropped_timestamps: dropped,
            negative_pm10,
            negative_pm2_5,
        }
    }

    /// Parse one source timestamp into an absolute instant. `None` covers
    /// both format mismatches and local times the zone cannot resolve
    /// (skipped or ambiguous during DST transitions).
    fn parse_local(&self, raw: &str) -> Option<DateTime<Tz>> {
        let naive = NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()?;
        self.timezone.from_local_datetime(&naive).single()
    }
}
