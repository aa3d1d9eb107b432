//! Core types for the taroko market data archiver.
//!
//! This crate provides the fundamental data structures used throughout taroko:
//!
//! - [`Instrument`] - A tradable instrument with board and category metadata
//! - [`MinuteBar`] - A one-minute OHLCV bar in local market time
//! - [`BarSet`] - Fetched bars plus the column order the source delivered
//! - [`FetchWindow`] - The time window an acquisition run requests
//! - [`FetchPlan`] - The planner's skip/append/rebuild decision

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/taroko-data/taroko/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod instrument;
mod plan;
pub mod timestamp;
mod window;

pub use bar::{BarColumn, BarSet, MinuteBar};
pub use error::{Result, TarokoError, TimestampError};
pub use instrument::{Board, Instrument};
pub use plan::{FetchPlan, PlanMode};
pub use window::FetchWindow;
