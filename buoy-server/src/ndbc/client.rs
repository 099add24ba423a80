//! NDBC HTTP client.
//!
//! Plain GETs with a per-request timeout, and a semaphore bounding how many
//! requests are in flight at once so a large `ids` batch does not open
//! dozens of connections to the upstream at the same moment.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use super::error::FetchError;
use super::source::NdbcSource;

/// Default base URL for the NDBC web server.
const DEFAULT_BASE_URL: &str = "https://www.ndbc.noaa.gov";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Path of the station catalog, relative to the base URL.
const CATALOG_PATH: &str = "/data/stations/station_table.txt";

/// Configuration for the NDBC client.
#[derive(Debug, Clone)]
pub struct NdbcConfig {
    /// Base URL for the NDBC web server
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
}

impl NdbcConfig {
    /// Set a custom base URL (for testing or a mirror).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

impl Default for NdbcConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

/// NDBC web client.
#[derive(Debug, Clone)]
pub struct NdbcClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl NdbcClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NdbcConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("buoy-server/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            // A zero-permit semaphore would block every request forever.
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// URL of the station catalog.
    pub fn catalog_url(&self) -> String {
        format!("{}{}", self.base_url, CATALOG_PATH)
    }

    /// URL of the realtime feed for a station.
    ///
    /// The identifier is interpolated verbatim.
    pub fn realtime_url(&self, station_id: &str) -> String {
        format!("{}/data/realtime2/{}.txt", self.base_url, station_id)
    }

    /// GET a URL and return its body as text.
    async fn get_text(&self, url: String) -> Result<String, FetchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FetchError::Network {
                url: url.clone(),
                message: "request semaphore closed".to_string(),
            })?;

        debug!(%url, "fetching");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::from_send(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_body(&url, e))
    }
}

impl NdbcSource for NdbcClient {
    async fn fetch_catalog(&self) -> Result<String, FetchError> {
        self.get_text(self.catalog_url()).await
    }

    async fn fetch_realtime(&self, station_id: &str) -> Result<String, FetchError> {
        self.get_text(self.realtime_url(station_id)).await
    }
}
