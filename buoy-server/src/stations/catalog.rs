//! NDBC station catalog parsing.
//!
//! `station_table.txt` is pipe-delimited with `#` comment lines:
//!
//! ```text
//! # STATION_ID | OWNER | TTYPE | HULL | NAME | PAYLOAD | LOCATION | TIMEZONE | FORECAST | NOTE
//! 51001|NDBC|Weather Buoy|3D|NORTHWESTERN HAWAII ONE|ARES|23.535 N 162.279 W (23°32'6" N 162°16'44" W)|H|...|
//! ```
//!
//! Only the identifier (field 0), name (field 4) and location (field 6)
//! are used.

use std::collections::HashMap;

use crate::ndbc::FetchError;

use super::meta::StationMeta;

/// Minimum number of `|`-separated fields for a usable line.
const MIN_FIELDS: usize = 7;

const ID_FIELD: usize = 0;
const NAME_FIELD: usize = 4;
const LOCATION_FIELD: usize = 6;

/// One station from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub meta: StationMeta,
}

/// Station metadata parsed from the NDBC catalog.
///
/// Entries keep the order of the catalog file. A catalog built from a
/// failed fetch is empty and remembers why.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
    load_error: Option<FetchError>,
}

impl Catalog {
    /// Parse catalog text. Malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut catalog = Self::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(entry) = parse_line(line) {
                catalog.insert(entry);
            }
        }

        catalog
    }

    /// An empty catalog standing in for one that could not be fetched.
    pub fn unavailable(err: FetchError) -> Self {
        Self {
            load_error: Some(err),
            ..Self::default()
        }
    }

    fn insert(&mut self, entry: CatalogEntry) {
        match self.index.get(&entry.id) {
            // Later lines win, but the station keeps its first position.
            Some(&i) => self.entries[i].meta = entry.meta,
            None => {
                self.index.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Look up a station.
    pub fn get(&self, station_id: &str) -> Option<&StationMeta> {
        self.index.get(station_id).map(|&i| &self.entries[i].meta)
    }

    /// All entries, in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries whose position is known.
    pub fn located(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.meta.position().is_some())
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no stations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fetch failure this catalog stands in for, if any.
    pub fn load_error(&self) -> Option<&FetchError> {
        self.load_error.as_ref()
    }
}

/// Parse one non-comment catalog line.
fn parse_line(line: &str) -> Option<CatalogEntry> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let (lat, lng) = match parse_location(fields[LOCATION_FIELD]) {
        Some((lat, lng)) => (Some(lat), Some(lng)),
        None => (None, None),
    };

    Some(CatalogEntry {
        id: fields[ID_FIELD].to_string(),
        meta: StationMeta {
            name: Some(fields[NAME_FIELD].to_string()),
            lat,
            lng,
        },
    })
}

/// Parse a location like `22.687 N 157.862 W` into signed (lat, lng).
///
/// Latitude is negative unless its hemisphere starts with `N`, longitude
/// negative unless it starts with `E`, both case-insensitive. Anything
/// after the fourth token is ignored.
pub fn parse_location(location: &str) -> Option<(f64, f64)> {
    let mut tokens = location.split_whitespace();
    let lat_mag = parse_magnitude(tokens.next()?)?;
    let lat_hemi = tokens.next()?;
    let lng_mag = parse_magnitude(tokens.next()?)?;
    let lng_hemi = tokens.next()?;

    let lat = if starts_with_ignore_case(lat_hemi, 'N') {
        lat_mag
    } else {
        -lat_mag
    };
    let lng = if starts_with_ignore_case(lng_hemi, 'E') {
        lng_mag
    } else {
        -lng_mag
    };

    Some((lat, lng))
}

fn parse_magnitude(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn starts_with_ignore_case(token: &str, c: char) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case(&c))
}
