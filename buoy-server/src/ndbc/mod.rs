//! NDBC (National Data Buoy Center) upstream access.
//!
//! Two plain-text resources are consumed:
//! - the station catalog, `data/stations/station_table.txt`, pipe-delimited
//! - per-station realtime feeds, `data/realtime2/{ID}.txt`, whitespace-columnar
//!
//! Both are fetched as text with a bounded timeout; parsing lives in
//! `stations` and `realtime`.

mod client;
mod error;
mod mock;
mod source;

pub use client::{NdbcClient, NdbcConfig};
pub use error::FetchError;
pub use mock::MockNdbcSource;
pub use source::NdbcSource;
