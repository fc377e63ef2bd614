//! Status command - summarize a persisted cumulative report.

use std::path::PathBuf;

use colored::Colorize;
use seqgate::{AccumulatedReport, StatusTier};

pub fn run(
    report_path: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    if !report_path.exists() {
        return Err(format!(
            "Report not found: {}\nRun 'seqgate ingest <FILES>...' first.",
            report_path.display()
        )
        .into());
    }

    let report = AccumulatedReport::load(&report_path)?;

    if json_output {
        let status = serde_json::json!({
            "report": report_path.display().to_string(),
            "version": report.version,
            "generated_at": report.generated_at,
            "total_samples": report.total_samples,
            "summary": report.summary,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(0);
    }

    println!(
        "{} {}",
        "Cumulative report".cyan().bold(),
        report_path.display().to_string().white()
    );
    println!("Generated: {}", report.generated_at);
    println!();

    println!("{}", "Samples:".yellow().bold());
    println!("  Total:  {}", report.total_samples.to_string().white().bold());
    println!("  Passed: {}", report.summary.pass.to_string().green());
    println!("  Warned: {}", report.summary.warn.to_string().yellow());
    println!("  Failed: {}", report.summary.fail.to_string().red());

    if verbose {
        println!();
        for record in &report.records {
            let tier = match record.status_tier {
                StatusTier::Pass => record.status_tier.label().green(),
                StatusTier::Warn => record.status_tier.label().yellow(),
                StatusTier::Fail => record.status_tier.label().red(),
            };
            println!(
                "  {} {} ({}) - {} diagnostic(s)",
                tier,
                record.sample_identity.white(),
                record.format_kind.label(),
                record.diagnostics.len()
            );
        }
    }

    Ok(0)
}
