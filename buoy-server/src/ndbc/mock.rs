//! Mock NDBC source for testing without network access.
//!
//! Serves canned catalog and realtime documents, either registered in code
//! or loaded from a directory laid out like the NDBC web server:
//! `station_table.txt` plus one `{ID}.txt` per station.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::error::FetchError;
use super::source::NdbcSource;

/// File name of the catalog inside a mock data directory.
const CATALOG_FILE: &str = "station_table.txt";

/// In-memory NDBC source.
///
/// Unknown stations and an unset catalog answer with HTTP 404, the same
/// way the real server does. Calls are counted so tests can assert how
/// often the upstream was hit.
#[derive(Debug)]
pub struct MockNdbcSource {
    catalog: Result<String, FetchError>,
    realtime: HashMap<String, Result<String, FetchError>>,
    catalog_delay: Duration,
    catalog_calls: AtomicUsize,
    realtime_calls: AtomicUsize,
}

impl MockNdbcSource {
    /// Create a mock with no catalog and no stations.
    pub fn new() -> Self {
        Self {
            catalog: Err(not_found(CATALOG_FILE)),
            realtime: HashMap::new(),
            catalog_delay: Duration::ZERO,
            catalog_calls: AtomicUsize::new(0),
            realtime_calls: AtomicUsize::new(0),
        }
    }

    /// Load a mock from a directory.
    ///
    /// `station_table.txt` becomes the catalog; every other `*.txt` file is
    /// served as the realtime feed of the station named by its file stem.
    pub fn from_dir(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut mock = Self::new();

        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("txt") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let text = std::fs::read_to_string(&path)?;
            if path.file_name().and_then(|s| s.to_str()) == Some(CATALOG_FILE) {
                mock.catalog = Ok(text);
            } else {
                mock.realtime.insert(stem.to_string(), Ok(text));
            }
        }

        Ok(mock)
    }

    /// Serve this text as the station catalog.
    pub fn with_catalog(mut self, text: impl Into<String>) -> Self {
        self.catalog = Ok(text.into());
        self
    }

    /// Make catalog fetches fail with this error.
    pub fn with_catalog_error(mut self, err: FetchError) -> Self {
        self.catalog = Err(err);
        self
    }

    /// Delay every catalog fetch, to widen race windows in tests.
    pub fn with_catalog_delay(mut self, delay: Duration) -> Self {
        self.catalog_delay = delay;
        self
    }

    /// Serve this text as the realtime feed of a station.
    pub fn with_station(mut self, station_id: &str, text: impl Into<String>) -> Self {
        self.realtime.insert(station_id.to_string(), Ok(text.into()));
        self
    }

    /// Make realtime fetches for a station fail with this error.
    pub fn with_station_error(mut self, station_id: &str, err: FetchError) -> Self {
        self.realtime.insert(station_id.to_string(), Err(err));
        self
    }

    /// Number of catalog fetches so far.
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    /// Number of realtime fetches so far, across all stations.
    pub fn realtime_calls(&self) -> usize {
        self.realtime_calls.load(Ordering::SeqCst)
    }

    /// Station identifiers with a registered realtime feed.
    pub fn stations(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.realtime.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for MockNdbcSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NdbcSource for MockNdbcSource {
    async fn fetch_catalog(&self) -> Result<String, FetchError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if !self.catalog_delay.is_zero() {
            tokio::time::sleep(self.catalog_delay).await;
        }
        self.catalog.clone()
    }

    async fn fetch_realtime(&self, station_id: &str) -> Result<String, FetchError> {
        self.realtime_calls.fetch_add(1, Ordering::SeqCst);
        self.realtime
            .get(station_id)
            .cloned()
            .unwrap_or_else(|| Err(not_found(&format!("{station_id}.txt"))))
    }
}

fn not_found(resource: &str) -> FetchError {
    FetchError::Status {
        url: format!("mock://{resource}"),
        status: 404,
    }
}
