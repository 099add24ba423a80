//! Station metadata.

use serde::Serialize;

/// Display name and position of a station.
///
/// Every field is optional: a lookup for an unknown station yields an
/// all-`None` value rather than no value at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationMeta {
    /// Human-readable station name
    pub name: Option<String>,
    /// Latitude in decimal degrees, north positive
    pub lat: Option<f64>,
    /// Longitude in decimal degrees, east positive
    pub lng: Option<f64>,
}

impl StationMeta {
    /// Metadata with a name and a known position.
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: Some(name.into()),
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// Metadata for a station nobody knows about.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Both coordinates, if the position is known.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }
}
