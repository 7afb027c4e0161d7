use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::RawReading;

/// Writes the merged table as a single CSV: header row, comma-separated,
/// numeric fields unquoted, missing values as empty fields.
pub struct MergedCsvWriter;

impl MergedCsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, rows: &[RawReading], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = rows.len(), "wrote merged dataset");
        Ok(())
    }
}

impl Default for MergedCsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
