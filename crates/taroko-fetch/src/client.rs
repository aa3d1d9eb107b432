//! HTTP implementation of the market source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use taroko_catalog::{Catalog, CatalogError};
use taroko_types::{BarSet, FetchWindow, Instrument};

use crate::decode;
use crate::source::{FetchError, MarketSource};
use crate::url;

/// Configuration for the HTTP market source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Base URL of the data service gateway.
    pub base_url: String,
    /// API key sent as `x-api-key` when set.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: url::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
            max_retries: 5,
            base_delay_ms: 500,   // Start with 500ms delay
            max_delay_ms: 30_000, // Max 30 seconds between retries
            user_agent: format!("taroko/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP market source with connection pooling and retry logic.
///
/// One session serves both collaborator roles: [`Catalog`] for the
/// instrument list and [`MarketSource`] for bars, usage and logout.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    config: SourceConfig,
}

impl HttpSource {
    /// Creates a new source with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: SourceConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a source with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(SourceConfig::default())
    }

    /// Returns the source configuration.
    #[must_use]
    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }

    /// Sends a GET and decodes the JSON body, retrying server errors,
    /// rate limiting and transient transport failures with backoff.
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut attempts = 0;

        loop {
            match self.decorate(self.client.get(url)).send().await {
                Ok(response) => {
                    if response.status().is_server_error()
                        || response.status() == StatusCode::TOO_MANY_REQUESTS
                    {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            tokio::time::sleep(self.backoff_delay(attempts)).await;
                            continue;
                        }
                        return Err(FetchError::ServerError {
                            status: response.status().as_u16(),
                        });
                    }

                    let response = response.error_for_status()?;
                    return Ok(response.json().await?);
                }
                Err(e) if is_retryable(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    tokio::time::sleep(self.backoff_delay(attempts)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Calculates the backoff delay with exponential growth and jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter (±25%), avoids pulling in a RNG.
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            (u64::from(attempt).wrapping_mul(17) % (jitter_range * 2))
                .saturating_sub(jitter_range)
        } else {
            0
        };

        Duration::from_millis((capped_delay + jitter).max(100))
    }
}

/// Determines if a transport error is worth retrying.
fn is_retryable(error: &reqwest::Error) -> bool {
    // Builder errors are configuration problems, not transient.
    if error.is_builder() {
        return false;
    }
    error.is_timeout() || error.is_connect() || error.is_request()
}

#[async_trait]
impl MarketSource for HttpSource {
    async fn fetch_bars(
        &self,
        instrument: &Instrument,
        window: &FetchWindow,
    ) -> Result<BarSet, FetchError> {
        let url = url::kbars_url(&self.config.base_url, instrument.code(), window);
        let reply = self.get_json(&url).await?;
        Ok(decode::decode_bars(&reply)?)
    }

    async fn usage(&self) -> Result<u64, FetchError> {
        let reply = self.get_json(&url::usage_url(&self.config.base_url)).await?;
        Ok(decode::decode_usage(&reply)?)
    }

    async fn logout(&self) -> Result<(), FetchError> {
        let url = url::logout_url(&self.config.base_url);
        self.decorate(self.client.post(url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for HttpSource {
    async fn instruments(&self) -> Result<Vec<Instrument>, CatalogError> {
        let reply = self
            .get_json(&url::instruments_url(&self.config.base_url))
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(serde_json::from_value(reply)?)
    }
}
