//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Seqgate: format detection and structural validation for pipeline inputs
#[derive(Parser)]
#[command(name = "seqgate")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate input files and merge them into the cumulative report
    Ingest {
        /// Input file(s) to process (FASTQ, BAM, TSV, CSV)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output directory for reports
        #[arg(short, long, default_value = "./seqgate_output")]
        output: PathBuf,

        /// File name for the cumulative JSON report
        #[arg(long, default_value = "seqgate_report.json")]
        json: String,

        /// File name for the rendered HTML report
        #[arg(long, default_value = "seqgate_report.html")]
        html: String,

        /// Validate only; do not write or update reports
        #[arg(long)]
        no_report: bool,
    },

    /// Show the summary of a persisted cumulative report
    Status {
        /// Path to the cumulative JSON report
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
