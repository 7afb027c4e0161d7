use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::models::RawReading;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;

/// Reads a single monthly export into typed rows.
///
/// The files share a fixed 5-column schema (timestamp, pm10, pm2_5,
/// temperature, pressure) with a header row. Any row that does not fit the
/// schema aborts the read; ragged or mistyped files must never contribute a
/// partial month to the merged dataset.
pub struct MeasurementReader {
    has_headers: bool,
}

impl MeasurementReader {
    pub fn new() -> Self {
        Self { has_headers: true }
    }

    pub fn with_headers(has_headers: bool) -> Self {
        Self { has_headers }
    }

    pub fn read_file(&self, path: &Path) -> Result<Vec<RawReading>> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .from_reader(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file));

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let reading: RawReading = result.map_err(|source| ReportError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
            rows.push(reading);
        }

        debug!(path = %path.display(), rows = rows.len(), "read measurement file");
        Ok(rows)
    }
}

impl Default for MeasurementReader {
    fn default() -> Self {
        Self::new()
    }
}
