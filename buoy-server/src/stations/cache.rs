//! Lazily loaded, process-lifetime station metadata cache.
//!
//! The catalog is fetched on first use and kept forever. A failed fetch is
//! cached too, as an empty catalog: metadata stays degraded until restart
//! rather than hammering NDBC on every request.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::ndbc::NdbcSource;

use super::catalog::Catalog;
use super::meta::StationMeta;
use super::seed::seed_meta;

/// Station metadata resolver backed by the NDBC catalog.
///
/// Population is single-flight: callers arriving while the catalog is being
/// fetched wait for that fetch instead of starting their own.
pub struct MetadataCache<S> {
    source: Arc<S>,
    catalog: OnceCell<Catalog>,
}

impl<S: NdbcSource> MetadataCache<S> {
    /// Create an empty cache that will load from `source` on first use.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            catalog: OnceCell::new(),
        }
    }

    /// Return the catalog, fetching it if this is the first call.
    pub async fn ensure_loaded(&self) -> &Catalog {
        self.catalog.get_or_init(|| self.load()).await
    }

    /// The catalog, if it has already been loaded (successfully or not).
    pub fn loaded(&self) -> Option<&Catalog> {
        self.catalog.get()
    }

    /// Resolve a station identifier to its metadata.
    ///
    /// The seed table wins over the catalog. Unknown stations resolve to
    /// all-`None` metadata.
    pub async fn resolve(&self, station_id: &str) -> StationMeta {
        if let Some(meta) = seed_meta(station_id) {
            return meta;
        }

        self.ensure_loaded()
            .await
            .get(station_id)
            .cloned()
            .unwrap_or_else(StationMeta::unknown)
    }

    async fn load(&self) -> Catalog {
        match self.source.fetch_catalog().await {
            Ok(text) => {
                let catalog = Catalog::parse(&text);
                info!(
                    stations = catalog.len(),
                    located = catalog.located().count(),
                    "loaded station catalog"
                );
                catalog
            }
            Err(e) => {
                warn!(
                    error = %e,
                    kind = e.kind(),
                    "station catalog unavailable; metadata limited to built-in stations until restart"
                );
                Catalog::unavailable(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndbc::{FetchError, MockNdbcSource};
    use futures::future::join_all;
    use std::time::Duration;

    const CATALOG: &str = "\
# STATION_ID | OWNER | TTYPE | HULL | NAME | PAYLOAD | LOCATION | TIMEZONE | FORECAST | NOTE
51001|NDBC|Weather Buoy|3D|CATALOG NAME FOR 51001|ARES|23.535 N 162.279 W|H|
46042|NDBC|Weather Buoy|3D|MONTEREY|AMPS|36.785 N 122.396 W|P|
";

    fn cache_with(mock: MockNdbcSource) -> (Arc<MockNdbcSource>, MetadataCache<MockNdbcSource>) {
        let source = Arc::new(mock);
        let cache = MetadataCache::new(source.clone());
        (source, cache)
    }

    #[tokio::test]
    async fn seed_wins_over_catalog() {
        let (source, cache) = cache_with(MockNdbcSource::new().with_catalog(CATALOG));

        // Seed hits never touch the catalog.
        let meta = cache.resolve("51001").await;
        assert_eq!(meta.name.as_deref(), Some("N. Hawaiian"));
        assert_eq!(source.catalog_calls(), 0);
        assert!(cache.loaded().is_none());

        let catalog = cache.ensure_loaded().await;
        assert_eq!(
            catalog.get("51001").and_then(|m| m.name.as_deref()),
            Some("CATALOG NAME FOR 51001")
        );

        let meta = cache.resolve("51001").await;
        assert_eq!(meta.name.as_deref(), Some("N. Hawaiian"));
        assert_eq!(meta.position(), Some((22.2, -157.9)));
        assert_eq!(source.catalog_calls(), 1);
    }

    #[tokio::test]
    async fn catalog_fallback() {
        let (_, cache) = cache_with(MockNdbcSource::new().with_catalog(CATALOG));

        let meta = cache.resolve("46042").await;

        assert_eq!(meta.name.as_deref(), Some("MONTEREY"));
        assert_eq!(meta.position(), Some((36.785, -122.396)));
    }

    #[tokio::test]
    async fn unknown_station_resolves_to_nulls() {
        let (_, cache) = cache_with(MockNdbcSource::new().with_catalog(CATALOG));

        assert_eq!(cache.resolve("99999").await, StationMeta::unknown());
    }

    #[tokio::test]
    async fn loads_only_once() {
        let (source, cache) = cache_with(MockNdbcSource::new().with_catalog(CATALOG));

        cache.ensure_loaded().await;
        cache.resolve("46042").await;
        cache.resolve("99999").await;

        assert_eq!(source.catalog_calls(), 1);
        assert_eq!(cache.loaded().map(Catalog::len), Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_fetch() {
        let (source, cache) = cache_with(
            MockNdbcSource::new()
                .with_catalog(CATALOG)
                .with_catalog_delay(Duration::from_millis(50)),
        );
        let cache = Arc::new(cache);

        let tasks = (0..16).map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.ensure_loaded().await.len() })
        });
        let counts = join_all(tasks).await;

        for count in counts {
            assert_eq!(count.unwrap(), 2);
        }
        assert_eq!(source.catalog_calls(), 1);
    }

    #[tokio::test]
    async fn failure_is_cached_as_empty() {
        let err = FetchError::Status {
            url: "mock://station_table.txt".into(),
            status: 503,
        };
        let (source, cache) =
            cache_with(MockNdbcSource::new().with_catalog_error(err.clone()));

        assert!(cache.ensure_loaded().await.is_empty());
        assert_eq!(cache.resolve("46042").await, StationMeta::unknown());
        // Seed entries still resolve.
        assert!(cache.resolve("51002").await.name.is_some());

        assert_eq!(source.catalog_calls(), 1);
        assert_eq!(cache.ensure_loaded().await.load_error(), Some(&err));
    }
}
