//! The parallel daily-conversion loop.
//!
//! Each minute archive converts independently, so the files fan out over
//! blocking worker tasks. Workers return typed outcomes instead of
//! printing; the coordinator restores input order before handing the batch
//! back, keeping output deterministic no matter which worker finished
//! first.

use std::path::PathBuf;

use futures::StreamExt;
use futures::stream;
use taroko_aggregate::convert_file;
use taroko_archive::{DataDir, layout};

use crate::acquire::RunError;
use crate::report::ConvertOutcome;

/// Converts every minute archive under the data dir into its daily
/// counterpart, running up to `parallel` files at once.
///
/// One file's failure never stops the others; it comes back as an `Err`
/// outcome in the returned batch. Outcomes are ordered like the scanned
/// file list (sorted by file name).
///
/// # Errors
///
/// Returns an error only if the archive directory itself cannot be read.
pub async fn run_conversion(
    data_dir: &DataDir,
    parallel: usize,
) -> Result<Vec<ConvertOutcome>, RunError> {
    let files = data_dir.minute_files()?;

    let mut indexed: Vec<(usize, ConvertOutcome)> = stream::iter(files.into_iter().enumerate())
        .map(|(index, path)| async move { (index, convert_one(path).await) })
        .buffer_unordered(parallel.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|entry| entry.0);
    Ok(indexed.into_iter().map(|(_, outcome)| outcome).collect())
}

/// Converts one minute archive on the blocking pool.
async fn convert_one(minute_path: PathBuf) -> ConvertOutcome {
    let code = layout::instrument_code(&minute_path)
        .unwrap_or("?")
        .to_string();
    let Some(daily_path) = layout::daily_counterpart(&minute_path) else {
        return ConvertOutcome {
            code,
            result: Err("not a minute archive path".to_string()),
        };
    };

    let joined =
        tokio::task::spawn_blocking(move || convert_file(&minute_path, &daily_path)).await;
    let result = match joined {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(err)) => Err(err.to_string()),
        Err(err) => Err(format!("conversion task panicked: {err}")),
    };

    ConvertOutcome { code, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "ts,Open,High,Low,Close,Volume";

    fn write_minute(dir: &TempDir, code: &str, rows: &[&str]) {
        let mut content = format!("{HEADER}\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(dir.path().join(format!("{code}_min.csv")), content).unwrap();
    }

    #[tokio::test]
    async fn test_converts_all_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        write_minute(&dir, "2330", &["2024-03-01 09:01:00,10,11,9,10.5,100"]);
        write_minute(&dir, "0050", &["2024-03-01 09:01:00,50,51,49,50.5,10"]);

        let outcomes = run_conversion(&DataDir::new(dir.path()), 4).await.unwrap();

        let codes: Vec<&str> = outcomes.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["0050", "2330"]);
        for outcome in &outcomes {
            let report = outcome.result.as_ref().unwrap();
            assert_eq!(report.days, 1);
        }
        assert!(dir.path().join("0050_day.csv").exists());
        assert!(dir.path().join("2330_day.csv").exists());
    }

    #[tokio::test]
    async fn test_one_bad_file_does_not_stop_the_rest() {
        let dir = TempDir::new().unwrap();
        write_minute(&dir, "2330", &["2024-03-01 09:01:00,10,11,9,10.5,100"]);
        // Header is missing the Volume column entirely.
        std::fs::write(
            dir.path().join("0050_min.csv"),
            "ts,Open,High,Low,Close\n2024-03-01 09:01:00,50,51,49,50.5\n",
        )
        .unwrap();

        let outcomes = run_conversion(&DataDir::new(dir.path()), 2).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_ok());
        assert!(outcomes[0].result.as_ref().unwrap_err().contains("Volume"));
        assert!(outcomes[1].is_ok());
        assert!(dir.path().join("2330_day.csv").exists());
        assert!(!dir.path().join("0050_day.csv").exists());
    }

    #[tokio::test]
    async fn test_empty_directory_yields_no_outcomes() {
        let dir = TempDir::new().unwrap();
        let outcomes = run_conversion(&DataDir::new(dir.path()), 8).await.unwrap();
        assert!(outcomes.is_empty());
    }
}
