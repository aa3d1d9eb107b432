//! Minute bar data representation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single one-minute OHLCV bar.
///
/// Timestamps are timezone-naive local market time, as stored in the
/// archive files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinuteBar {
    /// Minute timestamp (local market time, naive).
    pub ts: NaiveDateTime,
    /// Opening price.
    pub open: f64,
    /// Highest traded price.
    pub high: f64,
    /// Lowest traded price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl MinuteBar {
    /// Creates a new minute bar.
    #[must_use]
    pub const fn new(
        ts: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns true if the bar satisfies the OHLC/volume sanity invariants:
    /// the high is at least every other price, the low is at most every
    /// other price, and volume is non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.high >= self.open
            && self.high >= self.close
            && self.high >= self.low
            && self.low <= self.open
            && self.low <= self.close
            && self.volume >= 0.0
    }

    /// Returns true if every numeric field is exactly zero.
    ///
    /// Upstream emits all-zero rows as a "no trade this minute" sentinel;
    /// they carry no information and are dropped before aggregation.
    #[must_use]
    pub fn is_all_zero(&self) -> bool {
        self.open == 0.0
            && self.high == 0.0
            && self.low == 0.0
            && self.close == 0.0
            && self.volume == 0.0
    }
}

/// A named column of the minute bar schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarColumn {
    /// Timestamp column (`ts`).
    Ts,
    /// Opening price column.
    Open,
    /// High price column.
    High,
    /// Low price column.
    Low,
    /// Closing price column.
    Close,
    /// Volume column.
    Volume,
}

impl BarColumn {
    /// All columns in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Ts,
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::Volume,
    ];

    /// Returns the column's header name as written to archive files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ts => "ts",
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
        }
    }

    /// Looks a column up by its exact header name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ts" => Some(Self::Ts),
            "Open" => Some(Self::Open),
            "High" => Some(Self::High),
            "Low" => Some(Self::Low),
            "Close" => Some(Self::Close),
            "Volume" => Some(Self::Volume),
            _ => None,
        }
    }
}

impl std::fmt::Display for BarColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of fetched minute bars together with the column order the source
/// delivered them in.
///
/// The upstream wire format is column-major with no guaranteed key order,
/// so the delivery order is carried alongside the rows; the archive writer
/// uses it when creating a file and ignores it (conforming to the on-disk
/// header instead) when appending.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSet {
    columns: Vec<BarColumn>,
    bars: Vec<MinuteBar>,
}

impl BarSet {
    /// Creates a bar set with an explicit column delivery order.
    ///
    /// `columns` is expected to name each of the six schema columns exactly
    /// once; decoders enforce this before constructing a set.
    #[must_use]
    pub const fn new(columns: Vec<BarColumn>, bars: Vec<MinuteBar>) -> Self {
        Self { columns, bars }
    }

    /// Creates a bar set in canonical column order.
    #[must_use]
    pub fn canonical(bars: Vec<MinuteBar>) -> Self {
        Self {
            columns: BarColumn::ALL.to_vec(),
            bars,
        }
    }

    /// Creates an empty bar set (canonical column order, no rows).
    #[must_use]
    pub fn empty() -> Self {
        Self::canonical(Vec::new())
    }

    /// Returns the column delivery order.
    #[must_use]
    pub fn columns(&self) -> &[BarColumn] {
        &self.columns
    }

    /// Returns the bars.
    #[must_use]
    pub fn bars(&self) -> &[MinuteBar] {
        &self.bars
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the set holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_valid_bar() {
        let bar = MinuteBar::new(ts(9, 1), 10.0, 10.5, 9.8, 10.2, 1500.0);
        assert!(bar.is_valid());
        assert!(!bar.is_all_zero());
    }

    #[test]
    fn test_high_below_close_is_invalid() {
        let bar = MinuteBar::new(ts(9, 1), 10.0, 10.1, 9.8, 10.4, 1500.0);
        assert!(!bar.is_valid());
    }

    #[test]
    fn test_negative_volume_is_invalid() {
        let bar = MinuteBar::new(ts(9, 1), 10.0, 10.5, 9.8, 10.2, -1.0);
        assert!(!bar.is_valid());
    }

    #[test]
    fn test_all_zero_sentinel() {
        let bar = MinuteBar::new(ts(13, 30), 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(bar.is_all_zero());
        // A zero-volume bar with real prices is not the sentinel.
        let quiet = MinuteBar::new(ts(13, 31), 10.0, 10.0, 10.0, 10.0, 0.0);
        assert!(!quiet.is_all_zero());
    }

    #[test]
    fn test_column_names_round_trip() {
        for col in BarColumn::ALL {
            assert_eq!(BarColumn::from_name(col.as_str()), Some(col));
        }
        assert_eq!(BarColumn::from_name("Amount"), None);
        assert_eq!(BarColumn::from_name("TS"), None);
    }

    #[test]
    fn test_canonical_bar_set() {
        let set = BarSet::canonical(vec![MinuteBar::new(ts(9, 1), 1.0, 2.0, 0.5, 1.5, 10.0)]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.columns(), BarColumn::ALL);
        assert!(BarSet::empty().is_empty());
    }
}
