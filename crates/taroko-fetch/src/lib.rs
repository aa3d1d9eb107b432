//! Market data acquisition over HTTP for the taroko archiver.
//!
//! This crate owns the external source collaborator:
//!
//! - [`MarketSource`] - Bars, usage and logout as an async trait
//! - [`HttpSource`] - reqwest-backed implementation with retry/backoff
//! - [`decode`] - Column-major kbars reply decoding
//! - [`QuotaState`] / [`fetch_guarded`] - Quota-aware fetching

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/taroko-data/taroko/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod decode;
mod quota;
mod source;
pub mod url;

pub use client::{HttpSource, SourceConfig};
pub use decode::DecodeError;
pub use quota::{FetchOutcome, QuotaState, fetch_guarded};
pub use source::{FetchError, MarketSource};
