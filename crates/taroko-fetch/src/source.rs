//! The external market source collaborator.

use async_trait::async_trait;
use taroko_types::{BarSet, FetchWindow, Instrument};
use thiserror::Error;

use crate::decode::DecodeError;

/// Errors that can occur talking to the market source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server kept returning an error status after all retries.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// The reply body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Source of minute bars and session bookkeeping.
///
/// Implemented by the live HTTP session and by in-memory stand-ins for
/// tests. Any failure is recoverable from the caller's perspective: the
/// run loop treats it as "no data for this instrument" and consults
/// [`usage`](Self::usage) before moving on.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetches minute bars for one instrument over the given window.
    ///
    /// An empty set is a normal reply meaning the source has no data for
    /// the window.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the reply decode fails.
    async fn fetch_bars(
        &self,
        instrument: &Instrument,
        window: &FetchWindow,
    ) -> Result<BarSet, FetchError>;

    /// Returns the session's cumulative byte usage for the day.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be queried.
    async fn usage(&self) -> Result<u64, FetchError>;

    /// Ends the session. Called once at run end, success or failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout request fails.
    async fn logout(&self) -> Result<(), FetchError>;
}
