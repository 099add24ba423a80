//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::ndbc::NdbcSource;
use crate::readings::StationReading;

use super::dto::*;
use super::state::AppState;

/// Message returned when `/noaa` is called without station identifiers.
const IDS_USAGE: &str = "use ?ids=51001,51002,...";

/// Create the application router.
pub fn create_router<S: NdbcSource>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/noaa", get(latest_readings::<S>))
        .route("/stations", get(list_stations::<S>))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Latest readings for the stations named in `ids`, in request order.
async fn latest_readings<S: NdbcSource>(
    State(state): State<AppState<S>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<StationReading>>, AppError> {
    let req = NoaaQuery::from_pairs(pairs);
    let ids = req.station_ids();
    if ids.is_empty() {
        return Err(AppError::BadRequest {
            message: IDS_USAGE.to_string(),
        });
    }

    Ok(Json(state.readings.fetch_many(ids).await))
}

/// Every catalog station with a known position.
async fn list_stations<S: NdbcSource>(
    State(state): State<AppState<S>>,
) -> Json<Vec<StationSummary>> {
    let catalog = state.readings.metadata().ensure_loaded().await;

    Json(
        catalog
            .entries()
            .iter()
            .filter_map(StationSummary::from_entry)
            .collect(),
    )
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "not found".to_string(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, %message, "request rejected");

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
