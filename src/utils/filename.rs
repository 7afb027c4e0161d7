use std::path::PathBuf;

use chrono::{Datelike, Local};

/// Generate default merged-output filename with format: airq-merged-{YYMMDD}.csv
pub fn default_merged_filename() -> PathBuf {
    let now = Local::now();
    let filename = format!(
        "airq-merged-{:02}{:02}{:02}.csv",
        now.year() % 100,
        now.month(),
        now.day()
    );
    PathBuf::from("output").join(filename)
}
