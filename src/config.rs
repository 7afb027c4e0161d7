use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_TIMEZONE, DEFAULT_TOP_DAYS, EXPECTED_ROWS_PER_YEAR, PM10_DAILY_LIMIT,
    PM2_5_DAILY_LIMIT, PM2_5_YEARLY_LIMIT,
};

/// Report configuration, layered: built-in defaults, then an optional TOML
/// file, then `AIRQ_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// IANA zone name the source timestamps are localized to.
    pub timezone: String,
    /// Daily mean PM10 limit (µg/m³); a day above it is a breach day.
    pub pm10_daily_limit: f64,
    /// Daily mean PM2.5 limit (µg/m³).
    pub pm2_5_daily_limit: f64,
    /// Annual mean PM2.5 standard (µg/m³).
    pub pm2_5_yearly_limit: f64,
    /// Advisory sample count below which a year is reported as partial.
    pub expected_rows_per_year: usize,
    /// How many days the daily rankings keep.
    pub top_days: usize,
}

impl ReportConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("timezone", DEFAULT_TIMEZONE)?
            .set_default("pm10_daily_limit", PM10_DAILY_LIMIT)?
            .set_default("pm2_5_daily_limit", PM2_5_DAILY_LIMIT)?
            .set_default("pm2_5_yearly_limit", PM2_5_YEARLY_LIMIT)?
            .set_default("expected_rows_per_year", EXPECTED_ROWS_PER_YEAR as i64)?
            .set_default("top_days", DEFAULT_TOP_DAYS as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        let settings = builder
            .add_source(Environment::with_prefix("AIRQ"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            pm10_daily_limit: PM10_DAILY_LIMIT,
            pm2_5_daily_limit: PM2_5_DAILY_LIMIT,
            pm2_5_yearly_limit: PM2_5_YEARLY_LIMIT,
            expected_rows_per_year: EXPECTED_ROWS_PER_YEAR,
            top_days: DEFAULT_TOP_DAYS,
        }
    }
}
