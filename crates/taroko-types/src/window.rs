//! Fetch window computation primitives.

use chrono::{NaiveDate, NaiveDateTime};

/// The half-open time window an acquisition run asks the source for.
///
/// `start` carries the planner's intraday anchor; `end` is the process
/// start date at midnight. The upstream request itself is date-granular
/// ([`Self::start_date`] / [`Self::end_date`]), the intraday parts exist
/// only to make the skip comparison unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl FetchWindow {
    /// Creates a new fetch window.
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Returns the window start.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the window end.
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns the first date to request from the source.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Returns the last date to request from the source.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Returns true if the window covers nothing, i.e. the archive is
    /// already current through today and the instrument must be skipped
    /// before any network call.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl std::fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start_date(), self.end_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_window_dates() {
        let window = FetchWindow::new(dt(2024, 3, 1, 8), dt(2024, 3, 4, 0));
        assert_eq!(window.start_date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(window.end_date(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert!(!window.is_empty());
        assert_eq!(window.to_string(), "2024-03-01 to 2024-03-04");
    }

    #[test]
    fn test_anchored_start_today_is_empty() {
        // Tail from yesterday puts the anchored start after today's
        // midnight end, so nothing is fetched until tomorrow's run.
        let window = FetchWindow::new(dt(2024, 3, 4, 8), dt(2024, 3, 4, 0));
        assert!(window.is_empty());
    }

    #[test]
    fn test_start_past_end_is_empty() {
        let window = FetchWindow::new(dt(2024, 3, 5, 8), dt(2024, 3, 4, 0));
        assert!(window.is_empty());
    }
}
