//! Station metadata: built-in seed entries plus the NDBC catalog.
//!
//! Resolves a station identifier to a display name and position. The
//! catalog is fetched once per process and never refreshed.

mod cache;
mod catalog;
mod meta;
mod seed;

pub use cache::MetadataCache;
pub use catalog::{Catalog, CatalogEntry, parse_location};
pub use meta::StationMeta;
pub use seed::seed_meta;
