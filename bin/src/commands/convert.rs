//! Convert command implementation.
//!
//! Regenerates every daily archive from its minute archive, one blocking
//! task per file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use taroko_lib::{DataDir, run_conversion};

use crate::display::print_convert_outcomes;

/// Converts every minute archive under the data dir.
pub(crate) async fn convert(data_dir: &Path, parallel: usize, quiet: bool) -> Result<()> {
    let layout = DataDir::new(data_dir);

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] converting minute archives")
                .expect("Invalid progress template"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let outcomes = run_conversion(&layout, parallel)
        .await
        .with_context(|| format!("Cannot scan {}", data_dir.display()))?;
    progress.finish_and_clear();

    if outcomes.is_empty() {
        println!("No minute archives under {}", data_dir.display());
        return Ok(());
    }

    let failures = print_convert_outcomes(&outcomes, quiet);
    println!(
        "Converted {} of {} minute archives",
        outcomes.len() - failures,
        outcomes.len()
    );
    Ok(())
}
