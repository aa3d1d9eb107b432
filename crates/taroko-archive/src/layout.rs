//! Data-directory layout.
//!
//! All archive files live flat in one directory: `{code}_min.csv`,
//! `{code}_day.csv`, quarantine sidecars with a `.bak` suffix, plus the
//! catalog sidecar files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of minute archive files.
pub const MINUTE_SUFFIX: &str = "_min.csv";

/// Suffix of daily archive files.
pub const DAILY_SUFFIX: &str = "_day.csv";

/// Suffix appended to a corrupted archive when it is renamed aside.
pub const QUARANTINE_SUFFIX: &str = ".bak";

/// File name of the category map consumed by the catalog filter.
pub const CATEGORY_FILE: &str = "stock_category.json";

/// File name of the persisted code → name mapping.
pub const SYMBOL_MAPPING_FILE: &str = "stock_symbol_mapping.json";

/// The archive root directory and its naming scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Creates a layout over the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if creation fails.
    pub fn ensure_exists(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    /// Returns the minute archive path for an instrument code.
    #[must_use]
    pub fn minute_path(&self, code: &str) -> PathBuf {
        self.root.join(format!("{code}{MINUTE_SUFFIX}"))
    }

    /// Returns the daily archive path for an instrument code.
    #[must_use]
    pub fn daily_path(&self, code: &str) -> PathBuf {
        self.root.join(format!("{code}{DAILY_SUFFIX}"))
    }

    /// Returns the category map path.
    #[must_use]
    pub fn category_path(&self) -> PathBuf {
        self.root.join(CATEGORY_FILE)
    }

    /// Returns the symbol mapping path.
    #[must_use]
    pub fn symbol_mapping_path(&self) -> PathBuf {
        self.root.join(SYMBOL_MAPPING_FILE)
    }

    /// Lists every minute archive in the directory, sorted by file name
    /// so processing order is deterministic.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be read.
    pub fn minute_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.ends_with(MINUTE_SUFFIX))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Extracts the instrument code from a minute archive path.
///
/// Returns `None` when the path does not follow the `{code}_min.csv`
/// naming scheme.
#[must_use]
pub fn instrument_code(minute_path: &Path) -> Option<&str> {
    minute_path
        .file_name()?
        .to_str()?
        .strip_suffix(MINUTE_SUFFIX)
}

/// Maps a minute archive path to its daily counterpart.
///
/// Returns `None` when the path does not follow the `{code}_min.csv`
/// naming scheme.
#[must_use]
pub fn daily_counterpart(minute_path: &Path) -> Option<PathBuf> {
    let code = instrument_code(minute_path)?;
    Some(minute_path.with_file_name(format!("{code}{DAILY_SUFFIX}")))
}

/// Returns the quarantine sidecar path for an archive.
#[must_use]
pub fn quarantine_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(QUARANTINE_SUFFIX);
    PathBuf::from(os)
}
