//! Seqgate CLI - validate pipeline inputs and maintain the cumulative report.

mod cli;
mod commands;
mod html;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ingest {
            files,
            output,
            json,
            html,
            no_report,
        } => commands::ingest::run(files, output, json, html, no_report, cli.verbose),

        Commands::Status { report, json } => commands::status::run(report, json, cli.verbose),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
