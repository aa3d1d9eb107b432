//! Daily command implementation.
//!
//! Sequences one download pass and one convert pass. The convert step
//! still runs when the download step fails; the process exits non-zero
//! only when both steps fail outright.

use std::path::Path;

use anyhow::{Context, Result};

use crate::DownloadOptions;

/// Runs download, then convert.
pub(crate) async fn daily(
    data_dir: &Path,
    options: &DownloadOptions,
    parallel: usize,
    quiet: bool,
) -> Result<()> {
    let download = super::download::download(data_dir, options, quiet).await;
    if let Err(err) = &download {
        eprintln!("Error: download step failed: {err:#}");
    }

    let convert = super::convert::convert(data_dir, parallel, quiet).await;
    if let Err(err) = &convert {
        eprintln!("Error: convert step failed: {err:#}");
    }

    match (download, convert) {
        (Err(_), Err(err)) => Err(err).context("Both daily steps failed"),
        _ => Ok(()),
    }
}
