//! Minute-bar archiver and daily aggregator for Taiwan market data.
//!
//! This is a facade crate that re-exports functionality from the taroko
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use taroko_lib::prelude::*;
//! use taroko_lib::{DEFAULT_QUOTA_CEILING, default_earliest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpSource::with_defaults()?;
//!     let mut context = RunContext::new("data", default_earliest(), DEFAULT_QUOTA_CEILING);
//!
//!     let report = run_acquisition(&source, &source, &mut context, |done| {
//!         println!("{}: {}", done.code, done.outcome);
//!     })
//!     .await?;
//!     println!(
//!         "{} instruments, {} rows written",
//!         report.outcomes.len(),
//!         report.rows_written()
//!     );
//!
//!     let outcomes = run_conversion(&context.data_dir, 8).await?;
//!     println!("{} daily archives regenerated", outcomes.len());
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/taroko-data/taroko/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use taroko_types::*;

// Re-export catalog handling
pub use taroko_catalog::{
    Catalog, CatalogError, CategoryExclusions, EXCLUDED_LABEL, StaticCatalog, filter_instruments,
    write_symbol_mapping,
};

// Re-export archive handling
pub use taroko_archive::{
    ArchiveError, DataDir, Tail, append_anchor, last_timestamp, plan_acquisition, writer,
};

// Re-export acquisition
#[cfg(feature = "fetch")]
pub use taroko_fetch::{
    DecodeError, FetchError, FetchOutcome, HttpSource, MarketSource, QuotaState, SourceConfig,
    fetch_guarded, url,
};

// Re-export aggregation
#[cfg(feature = "aggregate")]
pub use taroko_aggregate::{
    AVERAGE_WINDOWS, AggregateError, ConvertReport, DAILY_HEADER, DailyBar, convert_file,
};

// Re-export run orchestration
#[cfg(feature = "run")]
pub use taroko_run::{
    BackupError, BackupReport, ConvertOutcome, DEFAULT_QUOTA_CEILING, InstrumentOutcome,
    InstrumentReport, RunContext, RunError, RunReport, backup_data_dir, default_earliest,
    run_acquisition, run_conversion,
};

/// Prelude module for convenient imports.
///
/// ```
/// use taroko_lib::prelude::*;
/// ```
pub mod prelude {
    pub use taroko_types::{
        BarColumn, BarSet, Board, FetchPlan, FetchWindow, Instrument, MinuteBar, PlanMode,
        TarokoError,
    };

    pub use taroko_archive::{DataDir, plan_acquisition};
    pub use taroko_catalog::{Catalog, CategoryExclusions, filter_instruments};

    #[cfg(feature = "fetch")]
    pub use taroko_fetch::{HttpSource, MarketSource, QuotaState, SourceConfig, fetch_guarded};

    #[cfg(feature = "aggregate")]
    pub use taroko_aggregate::{ConvertReport, convert_file};

    #[cfg(feature = "run")]
    pub use taroko_run::{
        RunContext, RunReport, backup_data_dir, run_acquisition, run_conversion,
    };
}
