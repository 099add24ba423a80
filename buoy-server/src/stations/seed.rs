//! Built-in metadata for a handful of Hawaiian buoys.
//!
//! These resolve without touching the catalog, so the most-requested
//! stations keep a name and position even when NDBC is unreachable.

use super::meta::StationMeta;

/// (id, name, lat, lng)
const SEED_STATIONS: &[(&str, &str, f64, f64)] = &[
    ("51001", "N. Hawaiian", 22.2, -157.9),
    ("51002", "S. Hawaiian", 20.4, -157.1),
    ("51211", "Kaneohe Bay", 21.45, -157.73),
    ("51212", "Waimea", 21.68, -158.05),
    ("51213", "Barbers Point", 21.20, -158.12),
];

/// Look up a station in the seed table.
pub fn seed_meta(station_id: &str) -> Option<StationMeta> {
    SEED_STATIONS
        .iter()
        .find(|(id, ..)| *id == station_id)
        .map(|&(_, name, lat, lng)| StationMeta::new(name, lat, lng))
}
