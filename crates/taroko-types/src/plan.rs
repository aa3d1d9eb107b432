//! Acquisition plan decisions.

use std::path::{Path, PathBuf};

use crate::FetchWindow;

/// How the acquisition run should treat one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    /// Archive already current, no fetch at all.
    Skip,
    /// Fetch the missing tail and append to the existing file.
    Append,
    /// Fetch full history and (re)create the file.
    FullRebuild,
}

impl PlanMode {
    /// Returns the mode as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Append => "append",
            Self::FullRebuild => "full-rebuild",
        }
    }
}

impl std::fmt::Display for PlanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The planner's decision for one instrument.
///
/// `Skip` plans carry no window; the two fetching modes always do. When a
/// corrupted archive was quarantined while planning, the sidecar path is
/// recorded so the run report can surface it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    mode: PlanMode,
    window: Option<FetchWindow>,
    quarantined: Option<PathBuf>,
}

impl FetchPlan {
    /// Plan that fetches nothing.
    #[must_use]
    pub const fn skip() -> Self {
        Self {
            mode: PlanMode::Skip,
            window: None,
            quarantined: None,
        }
    }

    /// Plan that appends the given window to an existing archive.
    #[must_use]
    pub const fn append(window: FetchWindow) -> Self {
        Self {
            mode: PlanMode::Append,
            window: Some(window),
            quarantined: None,
        }
    }

    /// Plan that rebuilds the archive from scratch over the given window.
    #[must_use]
    pub const fn full_rebuild(window: FetchWindow) -> Self {
        Self {
            mode: PlanMode::FullRebuild,
            window: Some(window),
            quarantined: None,
        }
    }

    /// Records the quarantine sidecar created while planning.
    #[must_use]
    pub fn with_quarantined(mut self, sidecar: PathBuf) -> Self {
        self.quarantined = Some(sidecar);
        self
    }

    /// Returns the plan mode.
    #[must_use]
    pub const fn mode(&self) -> PlanMode {
        self.mode
    }

    /// Returns the fetch window, absent for skip plans.
    #[must_use]
    pub const fn window(&self) -> Option<FetchWindow> {
        self.window
    }

    /// Returns the quarantine sidecar path if planning renamed a
    /// corrupted archive aside.
    #[must_use]
    pub fn quarantined(&self) -> Option<&Path> {
        self.quarantined.as_deref()
    }

    /// Returns true if nothing is to be fetched.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self.mode, PlanMode::Skip)
    }
}
