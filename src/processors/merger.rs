use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ReportError, Result};
use crate::models::RawReading;
use crate::readers::MeasurementReader;
use crate::utils::constants::INPUT_EXTENSION;
use crate::utils::progress::ProgressReporter;

/// One input file's contribution to the merged dataset.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// All monthly files concatenated, rows in file order.
#[derive(Debug)]
pub struct MergedDataset {
    pub rows: Vec<RawReading>,
    pub source_files: Vec<SourceFile>,
}

/// Concatenates the monthly exports of an input directory into one table.
///
/// Filenames are sorted lexically before reading so the merge order is
/// deterministic regardless of filesystem listing order; date-stamped names
/// (e.g. `2022-06.csv`) then merge chronologically.
pub struct DatasetMerger {
    reader: MeasurementReader,
}

impl DatasetMerger {
    pub fn new() -> Self {
        Self {
            reader: MeasurementReader::new(),
        }
    }

    pub fn merge_directory(
        &self,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<MergedDataset> {
        let files = self.input_files(dir)?;

        if files.is_empty() {
            return Err(ReportError::EmptyInput {
                dir: dir.to_path_buf(),
            });
        }

        let mut rows = Vec::new();
        let mut source_files = Vec::with_capacity(files.len());

        for path in files {
            if let Some(p) = progress {
                p.set_message(&format!("Reading {}", path.display()));
            }

            let file_rows = self.reader.read_file(&path)?;
            source_files.push(SourceFile {
                path,
                rows: file_rows.len(),
            });
            rows.extend(file_rows);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        info!(
            files = source_files.len(),
            rows = rows.len(),
            "merged input files"
        );

        Ok(MergedDataset { rows, source_files })
    }

    fn input_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_input = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION))
                .unwrap_or(false);
            if path.is_file() && is_input {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Default for DatasetMerger {
    fn default() -> Self {
        Self::new()
    }
}
