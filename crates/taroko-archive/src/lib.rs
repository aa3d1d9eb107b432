//! On-disk archive handling for the taroko market data archiver.
//!
//! This crate owns everything that touches the CSV archive directly:
//!
//! - [`DataDir`] - Path conventions inside the data directory
//! - [`Tail`] / [`last_timestamp`] - Cheap inspection of a file's final row
//! - [`plan_acquisition`] - The per-instrument skip/append/rebuild decision
//! - [`writer`] - Header-conforming append and atomic full rebuild

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/taroko-data/taroko/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod layout;
mod plan;
pub mod tail;
pub mod writer;

pub use layout::DataDir;
pub use plan::{append_anchor, plan_acquisition};
pub use tail::{Tail, last_timestamp};
pub use writer::ArchiveError;
