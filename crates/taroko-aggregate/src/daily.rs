//! Daily bar data structure.

use chrono::NaiveDate;

/// Moving-average windows carried on every daily bar, in column order.
pub const AVERAGE_WINDOWS: [usize; 4] = [5, 10, 20, 60];

/// Header row of a daily archive file.
pub const DAILY_HEADER: &str =
    "ts,Open,High,Low,Close,Volume,SMA5,SMA10,SMA20,SMA60,EMA5,EMA10,EMA20,EMA60";

/// One aggregated calendar day with its derived moving averages.
///
/// A day only exists when at least one valid minute bar survived
/// filtering; incomplete days are dropped, never zero-filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    /// Calendar date (local market time).
    pub date: NaiveDate,
    /// First minute bar's open.
    pub open: f64,
    /// Highest minute high.
    pub high: f64,
    /// Lowest minute low.
    pub low: f64,
    /// Last minute bar's close.
    pub close: f64,
    /// Summed minute volume.
    pub volume: f64,
    /// Trailing simple moving averages of the close, one per window in
    /// [`AVERAGE_WINDOWS`]; absent until a full window of history exists.
    pub sma: [Option<f64>; 4],
    /// Adjusted exponentially weighted averages of the close, one per
    /// span in [`AVERAGE_WINDOWS`]; defined from the first day.
    pub ema: [f64; 4],
}

impl DailyBar {
    /// Creates a daily bar from its aggregated fields, averages unset.
    #[must_use]
    pub const fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            sma: [None; 4],
            ema: [0.0; 4],
        }
    }
}
