use tracing::info;

use crate::cli::args::{Cli, Commands};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::processors::{DatasetMerger, FeatureDeriver, MergedDataset};
use crate::report::{DatasetSummary, Report};
use crate::utils::filename::default_merged_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::MergedCsvWriter;

pub fn run(cli: Cli) -> Result<()> {
    let config = ReportConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Report {
            input_dir,
            merged_file,
        } => {
            // Resolve the zone before any I/O; a bad zone name must not
            // cost a full directory read first.
            let deriver = FeatureDeriver::from_zone_name(&config.timezone)?;

            let merged = merge(&input_dir, cli.quiet)?;
            if let Some(path) = merged_file {
                MergedCsvWriter::new().write(&merged.rows, &path)?;
                println!("Merged dataset written to {}", path.display());
            }

            let source_files = merged.source_files.len();
            let merged_rows = merged.rows.len();
            let dataset = deriver.derive(merged.rows);

            let report = Report::assemble(&dataset, source_files, merged_rows, &config);
            println!("{}", report.render());
        }

        Commands::Merge {
            input_dir,
            output_file,
        } => {
            let merged = merge(&input_dir, cli.quiet)?;
            let path = output_file.unwrap_or_else(default_merged_filename);

            MergedCsvWriter::new().write(&merged.rows, &path)?;
            println!(
                "Merged {} rows from {} files into {}",
                merged.rows.len(),
                merged.source_files.len(),
                path.display()
            );
        }

        Commands::Validate { input_dir, json } => {
            let deriver = FeatureDeriver::from_zone_name(&config.timezone)?;

            let merged = merge(&input_dir, cli.quiet)?;
            let source_files = merged.source_files.len();
            let merged_rows = merged.rows.len();
            let dataset = deriver.derive(merged.rows);

            let summary = DatasetSummary::new(source_files, merged_rows, &dataset);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.render());
            }
        }
    }

    Ok(())
}

fn merge(input_dir: &std::path::Path, quiet: bool) -> Result<MergedDataset> {
    let progress = ProgressReporter::new_spinner("Merging input files...", quiet);
    let merged = DatasetMerger::new().merge_directory(input_dir, Some(&progress))?;
    progress.finish_with_message(&format!(
        "Merged {} rows from {} files",
        merged.rows.len(),
        merged.source_files.len()
    ));
    info!(
        dir = %input_dir.display(),
        files = merged.source_files.len(),
        "input directory merged"
    );
    Ok(merged)
}
