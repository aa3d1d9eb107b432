//! Run orchestration for the taroko minute-bar archiver.
//!
//! This crate ties the catalog, planner, fetcher, writer and aggregator
//! into complete runs:
//!
//! - [`RunContext`] - Per-run configuration plus quota state
//! - [`run_acquisition`] - Sequential, quota-aware fetch-and-persist loop
//! - [`run_conversion`] - Parallel minute-to-daily conversion loop
//! - [`backup_data_dir`] - Timestamped zip backup of the data directory
//! - [`RunReport`] / [`ConvertOutcome`] - Typed results for the caller to render

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/taroko-data/taroko/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod acquire;
mod backup;
mod context;
mod convert;
mod report;

pub use acquire::{RunError, run_acquisition};
pub use backup::{BackupError, BackupReport, backup_data_dir};
pub use context::{DEFAULT_QUOTA_CEILING, RunContext, default_earliest};
pub use convert::run_conversion;
pub use report::{ConvertOutcome, InstrumentOutcome, InstrumentReport, RunReport};
