//! Data transfer objects for web requests and responses.

use serde::Serialize;

use crate::stations::CatalogEntry;

/// Query string of `GET /noaa`.
#[derive(Debug, Default)]
pub struct NoaaQuery {
    /// Comma-separated station identifiers
    pub ids: Option<String>,
}

impl NoaaQuery {
    /// Build from raw query pairs. A repeated `ids` keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            ids: pairs
                .into_iter()
                .find(|(key, _)| key == "ids")
                .map(|(_, value)| value),
        }
    }

    /// Requested station identifiers, trimmed, empty segments dropped.
    pub fn station_ids(&self) -> Vec<&str> {
        self.ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }
}

/// A located station in the `/stations` listing.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub id: String,
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl StationSummary {
    /// Summarize a catalog entry; `None` if its position is unknown.
    pub fn from_entry(entry: &CatalogEntry) -> Option<Self> {
        let (lat, lng) = entry.meta.position()?;
        Some(Self {
            id: entry.id.clone(),
            name: entry.meta.name.clone(),
            lat,
            lng,
        })
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
