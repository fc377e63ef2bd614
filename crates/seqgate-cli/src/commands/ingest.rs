//! Ingest command - validate inputs and update the cumulative report.

use std::path::PathBuf;

use colored::Colorize;
use seqgate::{AccumulatedReport, SamtoolsReadCounter, Seqgate, StatusTier, ValidationRecord};

use crate::html;

pub fn run(
    files: Vec<PathBuf>,
    output: PathBuf,
    json_name: String,
    html_name: String,
    no_report: bool,
    verbose: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = Seqgate::new().with_read_counter(SamtoolsReadCounter::new());

    println!(
        "{} {} file(s)",
        "Validating".cyan().bold(),
        files.len().to_string().white().bold()
    );
    println!();

    let mut records = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        println!(
            "[{}/{}] {}",
            i + 1,
            files.len(),
            file.display().to_string().white()
        );

        let record = engine.ingest(file);
        print_record(&record, verbose);
        records.push(record);
    }

    let failed = records
        .iter()
        .filter(|r| r.status_tier == StatusTier::Fail)
        .count();
    let warned = records
        .iter()
        .filter(|r| r.status_tier == StatusTier::Warn)
        .count();
    let passed = records.len() - failed - warned;

    println!();
    println!(
        "Batch: {} passed, {} warned, {} failed",
        passed.to_string().green(),
        warned.to_string().yellow(),
        failed.to_string().red()
    );

    if !no_report {
        let json_path = output.join(&json_name);
        let html_path = output.join(&html_name);

        let mut report = AccumulatedReport::load_or_default(&json_path);
        let outcome = report.merge(records);
        report.save(&json_path)?;
        html::save(&report, &html_path)?;

        if !outcome.skipped.is_empty() {
            println!(
                "{} {} already-reported sample(s): {}",
                "Skipped".yellow().bold(),
                outcome.skipped.len(),
                outcome.skipped.join(", ")
            );
        }

        println!();
        println!(
            "{} {} ({} samples total)",
            "Report saved to".green().bold(),
            json_path.display().to_string().white(),
            report.total_samples.to_string().white().bold()
        );
        println!(
            "{} {}",
            "HTML report at".green().bold(),
            html_path.display().to_string().white()
        );
    }

    Ok(if failed > 0 { 1 } else { 0 })
}

fn print_record(record: &ValidationRecord, verbose: bool) {
    let tier = match record.status_tier {
        StatusTier::Pass => record.status_tier.label().green().bold(),
        StatusTier::Warn => record.status_tier.label().yellow().bold(),
        StatusTier::Fail => record.status_tier.label().red().bold(),
    };

    println!(
        "  {} {} ({})",
        tier,
        record.sample_identity.white().bold(),
        record.format_kind.label()
    );

    for finding in &record.diagnostics {
        println!("    {} {}", "-".red(), finding);
    }
    for advisory in &record.advisories {
        println!("    {} {}", "~".blue(), advisory);
    }

    if verbose {
        if let Some(count) = record.details.record_count {
            println!("    records: {}", count);
        }
        if let Some(len) = record.details.mean_sequence_length {
            println!("    mean read length: {} bp", len);
        }
        if let Some(cols) = record.details.column_count {
            println!("    columns: {}", cols);
        }
        if let Some(paired) = record.details.is_paired_end {
            println!("    paired-end: {}", paired);
        }
        println!("    size: {} bytes", record.byte_size);
    }
}
