//! Last-timestamp extraction from minute archives.
//!
//! Archives grow to years of minute rows; resuming a download must not
//! read them whole. The reader parses the header for the timestamp
//! column, then walks backward from end-of-file to the final data row.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use chrono::NaiveDateTime;
use taroko_types::timestamp;

/// Bytes pulled per backward scan step.
const CHUNK: u64 = 8192;

/// Result of probing an archive's tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// Timestamp of the last data row.
    Timestamp(NaiveDateTime),
    /// Nothing to resume from: file absent, empty, or header-only.
    Absent,
    /// Data rows exist but the tail cannot be interpreted; the file is
    /// not safe to append to.
    Unreadable,
}

impl Tail {
    /// Returns the parsed timestamp, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// Probes the archive at `path` for the timestamp of its last data row,
/// keyed by `column`.
///
/// Never propagates I/O or parse failures: anything unexpected on an
/// existing file maps to [`Tail::Unreadable`], a missing or dataless file
/// to [`Tail::Absent`].
#[must_use]
pub fn last_timestamp(path: &Path, column: &str) -> Tail {
    read_tail(path, column).unwrap_or(Tail::Unreadable)
}

fn read_tail(path: &Path, column: &str) -> io::Result<Tail> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Tail::Absent),
        Err(err) => return Err(err),
    };
    let len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut header = String::new();
    let data_start = reader.read_line(&mut header)? as u64;
    if header.trim().is_empty() {
        return Ok(Tail::Absent);
    }
    if data_start >= len {
        // Header only.
        return Ok(Tail::Absent);
    }

    let header_line = header.trim_end_matches(['\r', '\n']);
    let Some(column_index) = header_line.split(',').position(|name| name == column) else {
        // Rows exist but cannot be keyed by timestamp.
        return Ok(Tail::Unreadable);
    };

    let mut file = reader.into_inner();
    let Some(last_line) = read_last_line(&mut file, data_start, len)? else {
        return Ok(Tail::Absent);
    };

    let Some(cell) = last_line.split(',').nth(column_index) else {
        return Ok(Tail::Unreadable);
    };
    Ok(timestamp::parse_timestamp(cell).map_or(Tail::Unreadable, Tail::Timestamp))
}

/// Reads the final non-empty line of the region `[data_start, len)`,
/// pulling chunks from the end so large files are never read whole.
fn read_last_line(file: &mut File, data_start: u64, len: u64) -> io::Result<Option<String>> {
    let mut buf: Vec<u8> = Vec::new();
    let mut pos = len;

    loop {
        let chunk_start = pos.saturating_sub(CHUNK).max(data_start);
        let mut chunk = vec![0u8; (pos - chunk_start) as usize];
        file.seek(SeekFrom::Start(chunk_start))?;
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&buf);
        buf = chunk;
        pos = chunk_start;

        // Line terminators at end-of-file are not data.
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }

        if let Some(newline) = buf.iter().rposition(|&b| b == b'\n') {
            let line = &buf[newline + 1..];
            return Ok(Some(String::from_utf8_lossy(line).into_owned()));
        }
        if pos == data_start {
            if buf.is_empty() {
                return Ok(None);
            }
            return Ok(Some(String::from_utf8_lossy(&buf).into_owned()));
        }
    }
}
