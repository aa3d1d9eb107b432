//! Archive writes: header-conforming append and atomic full rebuild.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use taroko_types::{BarColumn, BarSet, MinuteBar, PlanMode, timestamp};
use thiserror::Error;

/// Errors that can occur persisting a bar set.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The on-disk header names a column the bar schema cannot provide.
    #[error("Column mismatch: archive column {column:?} is not in the bar schema")]
    ColumnMismatch {
        /// The unrecognized header column.
        column: String,
    },

    /// The existing archive has no parsable header row.
    #[error("Archive has no header row")]
    MissingHeader,

    /// Reading the existing header failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Persists a fetched bar set according to the plan mode.
///
/// An empty set means "no new data": nothing is written in any mode and
/// the existing file is left byte-identical. Returns the number of rows
/// written.
///
/// # Errors
///
/// Fails per the mode's contract; the existing file is never left in a
/// half-written state.
pub fn apply(path: &Path, mode: PlanMode, bars: &BarSet) -> Result<usize, ArchiveError> {
    if bars.is_empty() {
        return Ok(0);
    }
    match mode {
        PlanMode::Skip => Ok(0),
        PlanMode::Append => append(path, bars),
        PlanMode::FullRebuild => rebuild(path, bars),
    }
}

/// Replaces the archive with exactly this bar set.
///
/// Writes to a temporary file in the same directory and renames it over
/// the target, so a failure mid-write leaves the prior file untouched.
/// The header takes the set's column delivery order.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or persisted.
pub fn rebuild(path: &Path, bars: &BarSet) -> Result<usize, ArchiveError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let temp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        write_header(&mut writer, bars.columns())?;
        for bar in bars.bars() {
            write_row(&mut writer, bar, bars.columns())?;
        }
        writer.flush()?;
    }
    temp.persist(path).map_err(|err| ArchiveError::Io(err.error))?;
    Ok(bars.len())
}

/// Appends the bar set to an existing archive, conforming every row to
/// the column order already on disk.
///
/// Prior rows are never re-read or re-written. If the on-disk header
/// cannot be reconciled with the schema the append aborts with the file
/// untouched; overwriting is never a fallback.
///
/// # Errors
///
/// Returns [`ArchiveError::ColumnMismatch`] for an unrecognized header
/// column, [`ArchiveError::MissingHeader`] when there is no header row.
pub fn append(path: &Path, bars: &BarSet) -> Result<usize, ArchiveError> {
    let columns = disk_columns(path)?;

    let mut file = OpenOptions::new().read(true).append(true).open(path)?;
    let len = file.metadata()?.len();
    // Guard against a final row missing its newline.
    let needs_newline = if len == 0 {
        false
    } else {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        last[0] != b'\n'
    };

    let mut writer = BufWriter::new(&mut file);
    if needs_newline {
        writer.write_all(b"\n")?;
    }
    for bar in bars.bars() {
        write_row(&mut writer, bar, &columns)?;
    }
    writer.flush()?;
    Ok(bars.len())
}

/// Reads the existing header and maps it onto the bar schema.
fn disk_columns(path: &Path) -> Result<Vec<BarColumn>, ArchiveError> {
    let mut reader = csv::ReaderBuilder::new().from_path(path)?;
    let header = reader.headers()?;
    if header.is_empty() || (header.len() == 1 && header[0].trim().is_empty()) {
        return Err(ArchiveError::MissingHeader);
    }
    header
        .iter()
        .map(|name| {
            BarColumn::from_name(name.trim()).ok_or_else(|| ArchiveError::ColumnMismatch {
                column: name.to_string(),
            })
        })
        .collect()
}

fn write_header<W: Write>(writer: &mut W, columns: &[BarColumn]) -> io::Result<()> {
    let names: Vec<&str> = columns.iter().map(BarColumn::as_str).collect();
    writeln!(writer, "{}", names.join(","))
}

fn write_row<W: Write>(writer: &mut W, bar: &MinuteBar, columns: &[BarColumn]) -> io::Result<()> {
    for (index, column) in columns.iter().enumerate() {
        if index > 0 {
            write!(writer, ",")?;
        }
        match column {
            BarColumn::Ts => write!(writer, "{}", bar.ts.format(timestamp::MINUTE_FORMAT))?,
            BarColumn::Open => write!(writer, "{}", bar.open)?,
            BarColumn::High => write!(writer, "{}", bar.high)?,
            BarColumn::Low => write!(writer, "{}", bar.low)?,
            BarColumn::Close => write!(writer, "{}", bar.close)?,
            BarColumn::Volume => write!(writer, "{}", bar.volume)?,
        }
    }
    writeln!(writer)
}
