//! CLI command implementations.

use anyhow::{Context, Result};
use taroko_lib::{HttpSource, SourceConfig};

pub(crate) mod backup;
pub(crate) mod convert;
pub(crate) mod daily;
pub(crate) mod download;
pub(crate) mod list;

/// Builds the HTTP session, picking the API key up from the environment.
pub(crate) fn build_source(base_url: &str) -> Result<HttpSource> {
    let config = SourceConfig {
        base_url: base_url.to_string(),
        api_key: std::env::var("TAROKO_API_KEY").ok(),
        ..Default::default()
    };
    HttpSource::new(config).context("Cannot build HTTP client")
}
