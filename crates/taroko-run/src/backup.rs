//! Zip backups of the archive directory.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use taroko_archive::DataDir;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors that can occur writing a backup archive.
#[derive(Error, Debug)]
pub enum BackupError {
    /// I/O error walking the data dir or writing the zip.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The zip container could not be written.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// A finished backup archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    /// Where the zip was written.
    pub path: PathBuf,
    /// Size of the finished zip in bytes.
    pub bytes: u64,
    /// Number of files stored.
    pub files: usize,
}

/// Zips every file under the data dir into a timestamped archive.
///
/// The zip lands in `backup_dir` as `data_backup_YYYYmmdd_HHMMSS.zip`,
/// deflate-compressed, paths stored relative to the data dir root. A
/// failed write removes the partial zip before returning.
///
/// # Errors
///
/// Returns an error if the data dir cannot be walked or the zip cannot be
/// written.
pub fn backup_data_dir(data_dir: &DataDir, backup_dir: &Path) -> Result<BackupReport, BackupError> {
    fs::create_dir_all(backup_dir)?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let zip_path = backup_dir.join(format!("data_backup_{stamp}.zip"));

    match write_zip(data_dir.root(), &zip_path) {
        Ok(files) => {
            let bytes = fs::metadata(&zip_path)?.len();
            Ok(BackupReport {
                path: zip_path,
                bytes,
                files,
            })
        }
        Err(err) => {
            let _ = fs::remove_file(&zip_path);
            Err(err)
        }
    }
}

fn write_zip(root: &Path, zip_path: &Path) -> Result<usize, BackupError> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(zip_path)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut files = 0;
    add_directory(&mut zip, root, "", options, &mut files)?;

    let mut inner = zip.finish()?;
    inner.flush()?;
    Ok(files)
}

/// Adds a directory's files recursively; `prefix` is the relative path
/// inside the archive, empty at the root.
fn add_directory(
    zip: &mut ZipWriter<BufWriter<File>>,
    dir: &Path,
    prefix: &str,
    options: SimpleFileOptions,
    files: &mut usize,
) -> Result<(), BackupError> {
    // Sorted so the archive layout is reproducible.
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    for path in entries {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let relative = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };
        if path.is_dir() {
            add_directory(zip, &path, &relative, options, files)?;
        } else {
            zip.start_file(relative, options)?;
            let mut file = File::open(&path)?;
            io::copy(&mut file, zip)?;
            *files += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_zips_every_file_with_relative_paths() {
        let data = TempDir::new().unwrap();
        std::fs::write(data.path().join("2330_min.csv"), "ts,Open\n").unwrap();
        std::fs::write(data.path().join("stock_symbol_mapping.json"), "{}\n").unwrap();
        std::fs::create_dir(data.path().join("notes")).unwrap();
        std::fs::write(data.path().join("notes").join("readme.txt"), "hi\n").unwrap();
        let backups = TempDir::new().unwrap();

        let report = backup_data_dir(&DataDir::new(data.path()), backups.path()).unwrap();

        assert_eq!(report.files, 3);
        assert!(report.bytes > 0);
        let name = report.path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("data_backup_") && name.ends_with(".zip"));

        let mut archive = zip::ZipArchive::new(File::open(&report.path).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
        assert!(archive.by_name("2330_min.csv").is_ok());
        assert!(archive.by_name("notes/readme.txt").is_ok());
    }

    #[test]
    fn test_failed_backup_removes_partial_zip() {
        let backups = TempDir::new().unwrap();
        let missing = DataDir::new(backups.path().join("no-such-dir"));

        let result = backup_data_dir(&missing, backups.path());

        assert!(result.is_err());
        let leftovers: Vec<_> = std::fs::read_dir(backups.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect();
        assert!(leftovers.is_empty());
    }
}
