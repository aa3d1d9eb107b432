//! Minute archive reading for aggregation.

use std::path::Path;

use taroko_types::{BarColumn, MinuteBar, timestamp};

use crate::aggregator::AggregateError;

/// A parsed minute row, keeping the raw epoch integer when the file
/// stored one so diagnostics can cite it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MinuteRow {
    pub(crate) bar: MinuteBar,
    pub(crate) raw_epoch: Option<i64>,
}

/// Everything read from one minute archive.
#[derive(Debug)]
pub(crate) struct MinuteRead {
    pub(crate) rows: Vec<MinuteRow>,
    pub(crate) malformed: usize,
}

/// Indexes of the schema columns in one file's header.
struct ColumnsAt {
    ts: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnsAt {
    fn locate(header: &csv::StringRecord, path: &Path) -> Result<Self, AggregateError> {
        let find = |column: BarColumn| {
            header
                .iter()
                .position(|cell| cell.trim() == column.as_str())
                .ok_or_else(|| AggregateError::MissingColumn {
                    column: column.as_str(),
                    path: path.to_path_buf(),
                })
        };
        Ok(Self {
            ts: find(BarColumn::Ts)?,
            open: find(BarColumn::Open)?,
            high: find(BarColumn::High)?,
            low: find(BarColumn::Low)?,
            close: find(BarColumn::Close)?,
            volume: find(BarColumn::Volume)?,
        })
    }
}

/// Reads every data row of a minute archive.
///
/// Columns are selected by header name, so file-specific column order
/// and extra columns do not matter. Rows that cannot be parsed (ragged
/// lines, bad numbers, unreadable timestamps) are counted and skipped
/// rather than aborting the file.
pub(crate) fn read_minute_file(path: &Path) -> Result<MinuteRead, AggregateError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let header = reader.headers()?.clone();
    let at = ColumnsAt::locate(&header, path)?;

    let mut rows = Vec::new();
    let mut malformed = 0;
    for record in reader.records() {
        let Ok(record) = record else {
            malformed += 1;
            continue;
        };
        match parse_row(&record, &at) {
            Some(row) => rows.push(row),
            None => malformed += 1,
        }
    }
    Ok(MinuteRead { rows, malformed })
}

fn parse_row(record: &csv::StringRecord, at: &ColumnsAt) -> Option<MinuteRow> {
    let raw_ts = record.get(at.ts)?.trim();
    let ts = timestamp::parse_timestamp(raw_ts).ok()?;
    Some(MinuteRow {
        bar: MinuteBar::new(
            ts,
            number(record, at.open)?,
            number(record, at.high)?,
            number(record, at.low)?,
            number(record, at.close)?,
            number(record, at.volume)?,
        ),
        raw_epoch: raw_ts.parse().ok(),
    })
}

fn number(record: &csv::StringRecord, index: usize) -> Option<f64> {
    record.get(index)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_fixture(content: &str) -> Result<MinuteRead, AggregateError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2330_min.csv");
        std::fs::write(&path, content).unwrap();
        read_minute_file(&path)
    }

    #[test]
    fn test_reads_text_and_epoch_timestamps() {
        let read = read_fixture(
            "ts,Open,High,Low,Close,Volume\n\
             2024-01-05 09:01:00,10,11,9,10.5,100\n\
             1704445320000000000,10.5,12,10,11,150\n",
        )
        .unwrap();

        assert_eq!(read.rows.len(), 2);
        assert_eq!(read.malformed, 0);
        assert_eq!(read.rows[0].raw_epoch, None);
        assert_eq!(read.rows[1].raw_epoch, Some(1_704_445_320_000_000_000));
        assert_eq!(read.rows[1].bar.ts.format("%H:%M").to_string(), "09:02");
    }

    #[test]
    fn test_selects_columns_by_name() {
        let read = read_fixture(
            "Volume,ts,Close,Low,High,Open\n\
             100,2024-01-05 09:01:00,10.5,9,11,10\n",
        )
        .unwrap();

        let bar = read.rows[0].bar;
        assert_eq!(bar.open, 10.0);
        assert_eq!(bar.high, 11.0);
        assert_eq!(bar.volume, 100.0);
    }

    #[test]
    fn test_malformed_rows_counted_not_fatal() {
        let read = read_fixture(
            "ts,Open,High,Low,Close,Volume\n\
             2024-01-05 09:01:00,10,11,9,10.5,100\n\
             2024-01-05 09:02:00,10,11\n\
             garbage,a,b,c,d,e\n\
             2024-01-05 09:03:00,10,11,9,10.5,100\n",
        )
        .unwrap();

        assert_eq!(read.rows.len(), 2);
        assert_eq!(read.malformed, 2);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = read_fixture("ts,Open,High,Low,Close\n2024-01-05 09:01:00,1,1,1,1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            AggregateError::MissingColumn { column: "Volume", .. }
        ));
    }
}
