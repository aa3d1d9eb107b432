//! Minute-to-daily aggregation for the taroko market data archiver.
//!
//! - [`convert_file`] - One instrument's minute archive into its daily archive
//! - [`DailyBar`] - The aggregated day with its SMA/EMA columns
//! - [`indicators`] - Moving-average math over close series
//! - [`ConvertReport`] - Per-file diagnostics for the coordinator

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/taroko-data/taroko/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod daily;
pub mod indicators;
mod reader;

pub use aggregator::{AggregateError, ConvertReport, convert_file};
pub use daily::{AVERAGE_WINDOWS, DAILY_HEADER, DailyBar};
