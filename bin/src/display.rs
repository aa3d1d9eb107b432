//! Display utilities and output formatting for the taroko CLI.

use std::time::Duration;

use taroko_lib::{ConvertOutcome, InstrumentOutcome, RunReport};

/// Formats a byte count with binary units.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Formats a duration as seconds, or minutes and seconds past one minute.
pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

/// Prints the acquisition run summary.
pub(crate) fn print_run_summary(report: &RunReport) {
    println!(
        "\nDownload complete in {}:",
        format_duration(report.wall_time)
    );
    println!("  Appended:   {}", report.appended());
    println!("  Rebuilt:    {}", report.rebuilt());
    println!("  Up to date: {}", report.skipped());
    println!("  No data:    {}", report.no_data());
    println!("  Rows:       {}", report.rows_written());

    let failures: Vec<_> = report
        .outcomes
        .iter()
        .filter(|done| matches!(done.outcome, InstrumentOutcome::Failed { .. }))
        .collect();
    if !failures.is_empty() {
        println!("  Failed:     {}", failures.len());
        for done in failures {
            println!("    {}: {}", done.code, done.outcome);
        }
    }

    if report.quota_exhausted {
        println!(
            "  Quota exhausted at {}; {} instruments not reached",
            format_bytes(report.quota_used),
            report.unreached
        );
    }

    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
}

/// Prints per-file conversion results in input order; returns the number
/// of files that failed.
pub(crate) fn print_convert_outcomes(outcomes: &[ConvertOutcome], quiet: bool) -> usize {
    let mut failures = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => {
                if !quiet {
                    let mut line = format!(
                        "{:>8}  {} days from {} rows",
                        outcome.code, report.days, report.rows
                    );
                    if report.malformed > 0 {
                        line.push_str(&format!(", {} malformed", report.malformed));
                    }
                    if report.zero_rows > 0 {
                        line.push_str(&format!(", {} zero rows", report.zero_rows));
                    }
                    println!("{line}");
                }
                if let Some(summary) = report.violation_summary() {
                    eprintln!("Warning: {}: {summary}", outcome.code);
                }
            }
            Err(reason) => {
                failures += 1;
                eprintln!("Error: {}: {reason}", outcome.code);
            }
        }
    }
    failures
}
