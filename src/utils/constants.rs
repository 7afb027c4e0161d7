/// Timestamp format of the source exports (day-month-year, local time)
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Regulatory thresholds (µg/m³), exceedance is strictly greater-than
pub const PM10_DAILY_LIMIT: f64 = 50.0;
pub const PM2_5_DAILY_LIMIT: f64 = 50.0;
pub const PM2_5_YEARLY_LIMIT: f64 = 8.0;

/// Reporting defaults
pub const DEFAULT_TIMEZONE: &str = "Australia/Sydney";
pub const DEFAULT_TOP_DAYS: usize = 10;

/// Advisory full-year sample count, hourly cadence over 365 days
pub const EXPECTED_ROWS_PER_YEAR: usize = 8760;

/// Input file extension accepted by the merger
pub const INPUT_EXTENSION: &str = "csv";

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
