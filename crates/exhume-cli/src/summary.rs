//! Human-readable batch summary.

use console::style;
use exhume_core::BatchReport;
use exhume_core::FailureStatus;

/// Prints the final success/failure tally and any remaining failures.
pub fn print_summary(report: &BatchReport) {
    println!(
        "{} {}/{} archive(s) processed, {} payload file(s) harvested",
        style("done:").green().bold(),
        report.successful_jobs,
        report.total_jobs,
        report.payload_files.len()
    );

    let remaining: Vec<_> = report
        .failures
        .iter()
        .filter(|f| f.status != FailureStatus::Resolved)
        .collect();
    if !remaining.is_empty() {
        println!(
            "{} {} archive(s) could not be processed:",
            style("warning:").yellow().bold(),
            remaining.len()
        );
        for failure in remaining {
            println!("  {} - {}", failure.file_name(), failure.reason);
        }
    }
}
