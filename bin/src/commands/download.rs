//! Download command implementation.
//!
//! One acquisition pass: list the catalog, plan each instrument against
//! its archive tail, fetch what is missing and persist it, stopping early
//! if the daily quota runs out.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use taroko_lib::{RunContext, default_earliest, run_acquisition};

use crate::DownloadOptions;
use crate::display::print_run_summary;

/// Runs one acquisition pass and prints its summary.
pub(crate) async fn download(data_dir: &Path, options: &DownloadOptions, quiet: bool) -> Result<()> {
    let earliest = match options.earliest.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid earliest date: {s}"))?,
        None => default_earliest(),
    };

    let source = super::build_source(&options.base_url)?;
    let mut context = RunContext::new(data_dir, earliest, options.quota_ceiling)
        .with_limit(options.limit);

    // The instrument count is unknown until the catalog answers, so this
    // runs as a spinner that counts finished instruments.
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} done {msg}")
                .expect("Invalid progress template"),
        );
        pb
    };

    let report = run_acquisition(&source, &source, &mut context, |done| {
        progress.set_message(format!("{} {}", done.code, done.outcome));
        progress.inc(1);
    })
    .await
    .context("Download run failed")?;

    progress.finish_and_clear();

    if !quiet {
        print_run_summary(&report);
    } else {
        for warning in &report.warnings {
            eprintln!("Warning: {warning}");
        }
    }

    Ok(())
}
