//! The minute-to-daily aggregation pipeline.

use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use taroko_types::{MinuteBar, timestamp};
use thiserror::Error;

use crate::daily::{AVERAGE_WINDOWS, DAILY_HEADER, DailyBar};
use crate::indicators;
use crate::reader::{self, MinuteRow};

/// Diagnostic sample size for invalid rows.
const VIOLATION_SAMPLE_CAP: usize = 2;

/// Errors that can occur converting one instrument's file.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// The minute file's header lacks a required schema column.
    #[error("Column {column:?} missing from {}", .path.display())]
    MissingColumn {
        /// The absent column.
        column: &'static str,
        /// The offending minute file.
        path: PathBuf,
    },

    /// Reading the minute file failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Diagnostics from converting one minute archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    /// Daily rows written.
    pub days: usize,
    /// Well-formed minute rows read.
    pub rows: usize,
    /// Malformed lines skipped while parsing.
    pub malformed: usize,
    /// All-zero sentinel rows dropped.
    pub zero_rows: usize,
    /// Rows dropped for OHLC/volume violations.
    pub violations: usize,
    /// Up to the first two violating timestamps.
    pub violation_sample: Vec<String>,
}

impl ConvertReport {
    /// One-line description of dropped invalid rows, if any.
    #[must_use]
    pub fn violation_summary(&self) -> Option<String> {
        if self.violations == 0 {
            return None;
        }
        let mut summary = format!(
            "{} row(s) failed OHLC/volume checks, first at {}",
            self.violations,
            self.violation_sample.join(", ")
        );
        if self.violations > self.violation_sample.len() {
            summary.push_str(", ...");
        }
        Some(summary)
    }
}

/// Converts one instrument's minute archive into its daily archive.
///
/// The daily file is regenerated in full every run because the indicator
/// windows depend on the whole close history. The write goes through a
/// temporary file in the same directory, so a failure cannot leave a
/// torn daily archive behind.
///
/// # Errors
///
/// Returns an error if the minute file cannot be read or the daily file
/// cannot be written; the caller isolates failures per instrument.
pub fn convert_file(
    minute_path: &Path,
    daily_path: &Path,
) -> Result<ConvertReport, AggregateError> {
    let read = reader::read_minute_file(minute_path)?;
    let rows = read.rows.len();

    let (days, stats) = aggregate_rows(read.rows);
    write_daily(daily_path, &days)?;

    Ok(ConvertReport {
        days: days.len(),
        rows,
        malformed: read.malformed,
        zero_rows: stats.zero_rows,
        violations: stats.violations,
        violation_sample: stats.sample,
    })
}

struct FilterStats {
    zero_rows: usize,
    violations: usize,
    sample: Vec<String>,
}

/// Filters, buckets by calendar day and attaches moving averages.
fn aggregate_rows(mut rows: Vec<MinuteRow>) -> (Vec<DailyBar>, FilterStats) {
    // Stable, so duplicate minutes keep their file order.
    rows.sort_by_key(|row| row.bar.ts);

    let mut stats = FilterStats {
        zero_rows: 0,
        violations: 0,
        sample: Vec::new(),
    };
    let mut buckets: BTreeMap<NaiveDate, DayBuilder> = BTreeMap::new();
    for row in &rows {
        if row.bar.is_all_zero() {
            stats.zero_rows += 1;
            continue;
        }
        if !row.bar.is_valid() {
            stats.violations += 1;
            if stats.sample.len() < VIOLATION_SAMPLE_CAP {
                stats.sample.push(describe_violation(row));
            }
            continue;
        }
        buckets
            .entry(row.bar.ts.date())
            .and_modify(|day| day.update(&row.bar))
            .or_insert_with(|| DayBuilder::new(&row.bar));
    }

    let mut days: Vec<DailyBar> = buckets
        .into_iter()
        .map(|(date, builder)| builder.finish(date))
        .collect();
    attach_averages(&mut days);
    (days, stats)
}

fn describe_violation(row: &MinuteRow) -> String {
    let suffix = row
        .raw_epoch
        .map(|epoch| format!(" (TS={epoch})"))
        .unwrap_or_default();
    format!("{}{suffix}", row.bar.ts.format("%Y-%m-%d %H:%M"))
}

/// Builder for one calendar day's bar.
#[derive(Debug)]
struct DayBuilder {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl DayBuilder {
    /// Starts a day from its first valid minute bar.
    const fn new(bar: &MinuteBar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }

    /// Folds a later minute bar into the day.
    fn update(&mut self, bar: &MinuteBar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume += bar.volume;
    }

    /// Finishes the day.
    const fn finish(self, date: NaiveDate) -> DailyBar {
        DailyBar::new(date, self.open, self.high, self.low, self.close, self.volume)
    }
}

fn attach_averages(days: &mut [DailyBar]) {
    let closes: Vec<f64> = days.iter().map(|day| day.close).collect();
    for (slot, window) in AVERAGE_WINDOWS.into_iter().enumerate() {
        let sma = indicators::sma(&closes, window);
        let ema = indicators::ewma(&closes, window);
        for (i, day) in days.iter_mut().enumerate() {
            day.sma[slot] = sma[i].map(indicators::round2);
            day.ema[slot] = indicators::round2(ema[i]);
        }
    }
}

fn write_daily(path: &Path, days: &[DailyBar]) -> Result<(), AggregateError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let temp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        writeln!(writer, "{DAILY_HEADER}")?;
        for day in days {
            write_daily_row(&mut writer, day)?;
        }
        writer.flush()?;
    }
    temp.persist(path).map_err(|err| AggregateError::Io(err.error))?;
    Ok(())
}

fn write_daily_row<W: Write>(writer: &mut W, day: &DailyBar) -> io::Result<()> {
    write!(
        writer,
        "{},{},{},{},{},{}",
        day.date.format(timestamp::DATE_FORMAT),
        day.open,
        day.high,
        day.low,
        day.close,
        day.volume
    )?;
    for value in day.sma {
        match value {
            Some(average) => write!(writer, ",{average:.2}")?,
            None => write!(writer, ",")?,
        }
    }
    for value in day.ema {
        write!(writer, ",{value:.2}")?;
    }
    writeln!(writer)
}
