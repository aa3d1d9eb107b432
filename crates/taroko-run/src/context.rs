//! Per-run configuration and session state.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use taroko_archive::DataDir;
use taroko_fetch::QuotaState;

/// Daily byte ceiling the source grants a session (500 MB).
pub const DEFAULT_QUOTA_CEILING: u64 = 524_288_000;

/// First trading day the source can serve minute bars for.
#[must_use]
pub fn default_earliest() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 12, 7).unwrap()
}

/// Static configuration plus the mutable session state of one run.
///
/// All inputs are fixed when the run starts; the only mutation during the
/// acquisition loop is quota accounting. Passing this explicitly keeps the
/// planner and fetcher deterministic functions of their arguments.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Archive directory layout.
    pub data_dir: DataDir,
    /// Earliest calendar date a full rebuild fetches from.
    pub earliest: NaiveDate,
    /// The run's fixed "today", captured once at process start.
    pub today: NaiveDate,
    /// Usage accounting against the daily byte ceiling.
    pub quota: QuotaState,
    /// Optional cap on how many instruments the run processes.
    pub limit: Option<usize>,
}

impl RunContext {
    /// Creates a context for a run starting now.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, earliest: NaiveDate, quota_ceiling: u64) -> Self {
        Self::with_today(data_dir, earliest, quota_ceiling, Local::now().date_naive())
    }

    /// Creates a context with an explicit process-start date.
    #[must_use]
    pub fn with_today(
        data_dir: impl Into<PathBuf>,
        earliest: NaiveDate,
        quota_ceiling: u64,
        today: NaiveDate,
    ) -> Self {
        Self {
            data_dir: DataDir::new(data_dir.into()),
            earliest,
            today,
            quota: QuotaState::new(quota_ceiling),
            limit: None,
        }
    }

    /// Caps the number of instruments the run processes.
    #[must_use]
    pub const fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_captures_inputs() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let context = RunContext::with_today("data", default_earliest(), 1000, today)
            .with_limit(Some(5));

        assert_eq!(context.data_dir.root(), std::path::Path::new("data"));
        assert_eq!(context.earliest, default_earliest());
        assert_eq!(context.today, today);
        assert_eq!(context.quota.ceiling(), 1000);
        assert_eq!(context.limit, Some(5));
    }

    #[test]
    fn test_default_earliest() {
        assert_eq!(
            default_earliest(),
            NaiveDate::from_ymd_opt(2018, 12, 7).unwrap()
        );
    }
}
