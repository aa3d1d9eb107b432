//! Daily quota tracking and the quota-aware fetch step.

use std::time::{Duration, Instant};

use taroko_types::{BarSet, FetchWindow, Instrument};

use crate::source::{FetchError, MarketSource};

/// Cumulative session usage measured against the daily byte ceiling.
///
/// Shared across every instrument in a run; once exhausted it stays
/// exhausted, and the run loop stops before the next instrument.
#[derive(Debug, Clone)]
pub struct QuotaState {
    ceiling: u64,
    used: u64,
    exhausted: bool,
}

impl QuotaState {
    /// Creates quota state with the given byte ceiling.
    #[must_use]
    pub const fn new(ceiling: u64) -> Self {
        Self {
            ceiling,
            used: 0,
            exhausted: false,
        }
    }

    /// Records the source-reported cumulative usage.
    ///
    /// Meeting the ceiling exactly counts as exhaustion.
    pub const fn record(&mut self, used: u64) {
        self.used = used;
        if used >= self.ceiling {
            self.exhausted = true;
        }
    }

    /// Returns true once usage has met or exceeded the ceiling.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the last reported usage in bytes.
    #[must_use]
    pub const fn used(&self) -> u64 {
        self.used
    }

    /// Returns the configured ceiling in bytes.
    #[must_use]
    pub const fn ceiling(&self) -> u64 {
        self.ceiling
    }
}

/// Result of one quota-guarded fetch.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Fetched bars; empty on failure or when the source has no data.
    pub bars: BarSet,
    /// Wall time the fetch call took.
    pub elapsed: Duration,
    /// The failure that degraded this fetch to empty, if any.
    pub error: Option<FetchError>,
}

/// Fetches one instrument's window, degrading any failure to "no data".
///
/// The source's usage counter is consulted only after an empty or failed
/// fetch; a reply with data cannot be the one that crossed the ceiling,
/// and skipping the extra round-trip keeps the common path at one request
/// per instrument. A failed usage query leaves the quota state unchanged
/// rather than guessing.
pub async fn fetch_guarded(
    source: &dyn MarketSource,
    quota: &mut QuotaState,
    instrument: &Instrument,
    window: &FetchWindow,
) -> FetchOutcome {
    let started = Instant::now();
    let (bars, error) = match source.fetch_bars(instrument, window).await {
        Ok(bars) => (bars, None),
        Err(err) => (BarSet::empty(), Some(err)),
    };
    let elapsed = started.elapsed();

    if bars.is_empty() {
        if let Ok(used) = source.usage().await {
            quota.record(used);
        }
    }

    FetchOutcome {
        bars,
        elapsed,
        error,
    }
}
