//! Abstraction over where NDBC text resources come from.

use std::future::Future;

use super::error::FetchError;

/// A provider of the two NDBC text resources the service consumes.
///
/// `NdbcClient` talks to the real NDBC web server; `MockNdbcSource` serves
/// canned documents for tests and offline development.
pub trait NdbcSource: Send + Sync + 'static {
    /// Fetch the pipe-delimited station catalog (`station_table.txt`).
    fn fetch_catalog(&self) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Fetch the realtime feed (`realtime2/{id}.txt`) for one station.
    fn fetch_realtime(
        &self,
        station_id: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}
