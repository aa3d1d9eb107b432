//! Typed run results.
//!
//! Workers and loop steps never print; they produce these values and the
//! coordinating task renders them once the loop is done.

use std::time::Duration;

use taroko_aggregate::ConvertReport;

/// What the acquisition step did for one instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentOutcome {
    /// Archive already current; no fetch was made.
    Skipped,
    /// New rows were appended to the existing archive.
    Appended {
        /// Rows written.
        rows: usize,
    },
    /// The archive was rebuilt from scratch.
    Rebuilt {
        /// Rows written.
        rows: usize,
    },
    /// The source returned no bars for the window.
    NoData,
    /// The fetch or write failed; the archive was left untouched.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

impl InstrumentOutcome {
    /// Short label for summary tables.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Appended { .. } => "appended",
            Self::Rebuilt { .. } => "rebuilt",
            Self::NoData => "no data",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns true for outcomes that wrote rows.
    #[must_use]
    pub const fn wrote_rows(&self) -> bool {
        matches!(self, Self::Appended { .. } | Self::Rebuilt { .. })
    }
}

impl std::fmt::Display for InstrumentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped => write!(f, "up to date"),
            Self::Appended { rows } => write!(f, "appended {rows} rows"),
            Self::Rebuilt { rows } => write!(f, "rebuilt with {rows} rows"),
            Self::NoData => write!(f, "no data"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// One instrument's acquisition result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentReport {
    /// Instrument code.
    pub code: String,
    /// What happened.
    pub outcome: InstrumentOutcome,
    /// Wall time the fetch took; zero for skips.
    pub elapsed: Duration,
}

/// Everything one acquisition run did.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Per-instrument results in processing order.
    pub outcomes: Vec<InstrumentReport>,
    /// Instruments the loop never reached because the quota ran out.
    pub unreached: usize,
    /// Bytes the source reported consumed, as of the last usage query.
    pub quota_used: u64,
    /// True when the run stopped early on quota exhaustion.
    pub quota_exhausted: bool,
    /// Wall time of the whole loop, catalog listing included.
    pub wall_time: Duration,
    /// Non-fatal conditions observed along the way.
    pub warnings: Vec<String>,
}

impl RunReport {
    fn count(&self, matches: impl Fn(&InstrumentOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|report| matches(&report.outcome))
            .count()
    }

    /// Instruments skipped as already current.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, InstrumentOutcome::Skipped))
    }

    /// Instruments that had rows appended.
    #[must_use]
    pub fn appended(&self) -> usize {
        self.count(|outcome| matches!(outcome, InstrumentOutcome::Appended { .. }))
    }

    /// Instruments rebuilt from scratch.
    #[must_use]
    pub fn rebuilt(&self) -> usize {
        self.count(|outcome| matches!(outcome, InstrumentOutcome::Rebuilt { .. }))
    }

    /// Instruments the source had no bars for.
    #[must_use]
    pub fn no_data(&self) -> usize {
        self.count(|outcome| matches!(outcome, InstrumentOutcome::NoData))
    }

    /// Instruments whose fetch or write failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, InstrumentOutcome::Failed { .. }))
    }

    /// Total minute rows written across all instruments.
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.outcomes
            .iter()
            .map(|report| match report.outcome {
                InstrumentOutcome::Appended { rows } | InstrumentOutcome::Rebuilt { rows } => rows,
                _ => 0,
            })
            .sum()
    }
}

/// Result of converting one minute archive, tagged with its instrument.
#[derive(Debug)]
pub struct ConvertOutcome {
    /// Instrument code, from the minute file name.
    pub code: String,
    /// Conversion diagnostics, or the reason this file failed.
    pub result: Result<ConvertReport, String>,
}

impl ConvertOutcome {
    /// Returns true when the file converted cleanly.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
