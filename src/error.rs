use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No input files found in '{}'", .dir.display())]
    EmptyInput { dir: PathBuf },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown time zone: '{0}'")]
    Timezone(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
