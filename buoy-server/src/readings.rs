//! Latest readings per station: realtime observation plus metadata.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::ndbc::{FetchError, NdbcSource};
use crate::realtime::{self, Observation};
use crate::stations::{MetadataCache, StationMeta};

/// One station in a `/noaa` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReading {
    pub id: String,

    #[serde(flatten)]
    pub meta: StationMeta,

    #[serde(flatten)]
    pub observation: Observation,

    /// Why the observation is missing, if the feed could not be fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StationReading {
    /// A reading built from a successfully fetched feed.
    pub fn observed(id: impl Into<String>, meta: StationMeta, observation: Observation) -> Self {
        Self {
            id: id.into(),
            meta,
            observation,
            error: None,
        }
    }

    /// A reading whose feed could not be fetched.
    pub fn failed(id: impl Into<String>, meta: StationMeta, err: &FetchError) -> Self {
        Self {
            id: id.into(),
            meta,
            observation: Observation::default(),
            error: Some(err.to_string()),
        }
    }
}

/// Fetches and assembles station readings.
pub struct Readings<S> {
    source: Arc<S>,
    metadata: MetadataCache<S>,
}

impl<S: NdbcSource> Readings<S> {
    /// Create a reader over `source`, with a fresh metadata cache on the same source.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            metadata: MetadataCache::new(source.clone()),
            source,
        }
    }

    /// The station metadata cache.
    pub fn metadata(&self) -> &MetadataCache<S> {
        &self.metadata
    }

    /// Latest reading for one station.
    ///
    /// Never fails: a feed that cannot be fetched yields a reading with
    /// metadata, no observation, and an `error` message.
    pub async fn fetch_latest(&self, station_id: &str) -> StationReading {
        let (feed, meta) = tokio::join!(
            self.source.fetch_realtime(station_id),
            self.metadata.resolve(station_id)
        );

        match feed {
            Ok(text) => {
                let observation = realtime::parse(&text);
                if observation.is_empty() {
                    debug!(station = %station_id, "realtime feed had no usable observation");
                }
                StationReading::observed(station_id, meta, observation)
            }
            Err(e) => {
                warn!(station = %station_id, error = %e, kind = e.kind(), "realtime fetch failed");
                StationReading::failed(station_id, meta, &e)
            }
        }
    }

    /// Latest readings for several stations, in the order given.
    ///
    /// Stations are fetched concurrently; one failing does not affect the others.
    pub async fn fetch_many<I>(&self, station_ids: I) -> Vec<StationReading>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let ids: Vec<I::Item> = station_ids.into_iter().collect();
        join_all(ids.iter().map(|id| self.fetch_latest(id.as_ref()))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndbc::MockNdbcSource;

    const FEED: &str = "\
#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES
2024 06 15 12 00  70  7.0  9.0   1.5     9   6.4 270 1016.2
";

    const CATALOG: &str = "46042|NDBC|Weather Buoy|3D|MONTEREY|AMPS|36.785 N 122.396 W|P|\n";

    fn readings(mock: MockNdbcSource) -> (Arc<MockNdbcSource>, Readings<MockNdbcSource>) {
        let source = Arc::new(mock);
        (source.clone(), Readings::new(source))
    }

    #[tokio::test]
    async fn successful_fetch_merges_metadata() {
        let (_, readings) = readings(MockNdbcSource::new().with_station("51001", FEED));

        let reading = readings.fetch_latest("51001").await;

        assert_eq!(reading.id, "51001");
        assert_eq!(reading.meta.name.as_deref(), Some("N. Hawaiian"));
        assert_eq!(reading.observation.wave_height, Some(1.5));
        assert_eq!(reading.observation.dominant_period, Some(9));
        assert_eq!(reading.observation.mean_direction, Some(270));
        assert_eq!(reading.error, None);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_metadata() {
        let (_, readings) = readings(MockNdbcSource::new().with_catalog(CATALOG));

        let reading = readings.fetch_latest("46042").await;

        assert_eq!(reading.meta.name.as_deref(), Some("MONTEREY"));
        assert!(reading.observation.is_empty());
        let error = reading.error.unwrap();
        assert!(error.contains("404"), "unexpected error: {error}");
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let err = FetchError::Timeout {
            url: "https://www.ndbc.noaa.gov/data/realtime2/51002.txt".into(),
        };
        let (_, readings) = readings(MockNdbcSource::new().with_station_error("51002", err));

        let reading = readings.fetch_latest("51002").await;

        assert_eq!(
            reading.error.as_deref(),
            Some("request to https://www.ndbc.noaa.gov/data/realtime2/51002.txt timed out")
        );
        assert_eq!(reading.meta.name.as_deref(), Some("S. Hawaiian"));
    }

    #[tokio::test]
    async fn batch_preserves_order_and_isolates_failures() {
        let (source, readings) = readings(
            MockNdbcSource::new()
                .with_catalog(CATALOG)
                .with_station("51001", FEED)
                .with_station("46042", FEED),
        );

        let batch = readings.fetch_many(["46042", "99999", "51001"]).await;

        let ids: Vec<&str> = batch.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["46042", "99999", "51001"]);
        assert!(batch[0].error.is_none());
        assert!(batch[1].error.is_some());
        assert_eq!(batch[1].meta, StationMeta::unknown());
        assert!(batch[2].error.is_none());

        assert_eq!(source.realtime_calls(), 3);
        assert_eq!(source.catalog_calls(), 1);
    }

    #[test]
    fn serialized_shape() {
        let reading = StationReading::observed(
            "51001",
            StationMeta::new("N. Hawaiian", 22.2, -157.9),
            Observation {
                wave_height: Some(1.5),
                dominant_period: Some(9),
                mean_direction: Some(270),
                observed_at: None,
            },
        );

        assert_eq!(
            serde_json::to_value(&reading).unwrap(),
            serde_json::json!({
                "id": "51001",
                "name": "N. Hawaiian",
                "lat": 22.2,
                "lng": -157.9,
                "Hs": 1.5,
                "Tp": 9,
                "Dir": 270,
                "time": null
            })
        );
    }

    #[test]
    fn failed_reading_serializes_error() {
        let err = FetchError::Status {
            url: "https://www.ndbc.noaa.gov/data/realtime2/99999.txt".into(),
            status: 404,
        };
        let reading = StationReading::failed("99999", StationMeta::unknown(), &err);
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["Hs"], serde_json::Value::Null);
        assert_eq!(json["time"], serde_json::Value::Null);
        assert_eq!(
            json["error"],
            "https://www.ndbc.noaa.gov/data/realtime2/99999.txt returned HTTP 404"
        );
    }
}
