//! Backup command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use taroko_lib::{DataDir, backup_data_dir};

use crate::display::format_bytes;

/// Zips the data directory into a timestamped archive.
pub(crate) fn backup(data_dir: &Path, backup_dir: &Path) -> Result<()> {
    if !data_dir.is_dir() {
        bail!("No data directory at {}", data_dir.display());
    }

    let report = backup_data_dir(&DataDir::new(data_dir), backup_dir)
        .with_context(|| format!("Backup of {} failed", data_dir.display()))?;

    println!(
        "Backed up {} files to {} ({})",
        report.files,
        report.path.display(),
        format_bytes(report.bytes)
    );
    Ok(())
}
