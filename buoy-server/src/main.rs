use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use buoy_server::config::ServerConfig;
use buoy_server::ndbc::{MockNdbcSource, NdbcClient, NdbcSource};
use buoy_server::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "buoy_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env()?;

    match &config.mock_dir {
        Some(dir) => {
            let source = MockNdbcSource::from_dir(dir)?;
            warn!(
                dir = %dir.display(),
                stations = source.stations().len(),
                "serving mock NDBC data"
            );
            serve(&config, source).await
        }
        None => {
            info!(base_url = %config.ndbc.base_url, "using NDBC upstream");
            serve(&config, NdbcClient::new(config.ndbc.clone())?).await
        }
    }
}

async fn serve<S: NdbcSource>(config: &ServerConfig, source: S) -> Result<(), Box<dyn Error>> {
    let state = AppState::new(Arc::new(source));

    // Warm the metadata cache before taking traffic. A failure is cached as
    // an empty catalog and does not stop startup.
    let catalog = state.readings.metadata().ensure_loaded().await;
    if catalog.load_error().is_some() {
        warn!("starting without station catalog");
    }

    let app = create_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "buoy proxy listening");
    info!("  GET /noaa?ids=51001,51002  - latest wave readings");
    info!("  GET /stations              - catalog stations with positions");
    info!("  GET /health                - health check");

    axum::serve(listener, app).await?;
    Ok(())
}
