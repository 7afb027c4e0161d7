use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airq-report")]
#[command(about = "Air-quality measurement report generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and print the report
    Report {
        #[arg(short, long, help = "Directory of monthly measurement CSV files")]
        input_dir: PathBuf,

        #[arg(
            short,
            long,
            help = "Also write the merged dataset to this CSV file"
        )]
        merged_file: Option<PathBuf>,
    },

    /// Merge monthly measurement files into a single CSV
    Merge {
        #[arg(short, long, help = "Directory of monthly measurement CSV files")]
        input_dir: PathBuf,

        #[arg(
            short,
            long,
            help = "Merged CSV output path [default: output/airq-merged-{YYMMDD}.csv]"
        )]
        output_file: Option<PathBuf>,
    },

    /// Parse and derive only; print a dataset quality summary
    Validate {
        #[arg(short, long, help = "Directory of monthly measurement CSV files")]
        input_dir: PathBuf,

        #[arg(long, default_value = "false", help = "Emit the summary as JSON")]
        json: bool,
    },
}
