//! Acquisition planning.
//!
//! The planner is a pure function of the archive's durable tail state
//! plus the run's clock inputs, so a half-completed run resumes correctly
//! by simply re-planning.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use taroko_types::{BarColumn, FetchPlan, FetchWindow};

use crate::layout;
use crate::tail::{self, Tail};

/// Intraday anchor for append-mode fetch starts.
///
/// The market opens at 09:00; anchoring an hour earlier keeps the window
/// comparison strictly date-driven without touching session rows.
#[must_use]
pub fn append_anchor() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap()
}

/// Decides what to fetch for one instrument.
///
/// - Missing/empty archive: full rebuild from `earliest`.
/// - Valid tail at timestamp `D`: append starting the day after `D`.
/// - Unreadable tail: quarantine the file aside (best effort) and fall
///   back to a full rebuild.
/// - Whenever the resulting window is empty, skip; the skip decision is
///   made here, before any network call, so skipped instruments cost no
///   quota.
#[must_use]
pub fn plan_acquisition(minute_path: &Path, earliest: NaiveDate, today: NaiveDate) -> FetchPlan {
    let end = today.and_hms_opt(0, 0, 0).unwrap();
    let rebuild_window = FetchWindow::new(earliest.and_hms_opt(0, 0, 0).unwrap(), end);

    match tail::last_timestamp(minute_path, BarColumn::Ts.as_str()) {
        Tail::Timestamp(last) => {
            let Some(next_day) = last.date().succ_opt() else {
                return FetchPlan::skip();
            };
            let window = FetchWindow::new(next_day.and_time(append_anchor()), end);
            if window.is_empty() {
                FetchPlan::skip()
            } else {
                FetchPlan::append(window)
            }
        }
        Tail::Absent => {
            if rebuild_window.is_empty() {
                FetchPlan::skip()
            } else {
                FetchPlan::full_rebuild(rebuild_window)
            }
        }
        Tail::Unreadable => {
            let sidecar = quarantine(minute_path);
            if rebuild_window.is_empty() {
                return FetchPlan::skip();
            }
            let plan = FetchPlan::full_rebuild(rebuild_window);
            match sidecar {
                Some(path) => plan.with_quarantined(path),
                None => plan,
            }
        }
    }
}

/// Renames a corrupted archive to its `.bak` sidecar.
///
/// Best effort: a failed rename returns `None` and the rebuild simply
/// replaces the corrupt file in place.
fn quarantine(path: &Path) -> Option<PathBuf> {
    let sidecar = layout::quarantine_path(path);
    fs::rename(path, &sidecar).ok().map(|()| sidecar)
}
