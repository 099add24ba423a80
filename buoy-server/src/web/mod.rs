//! Web layer for the buoy proxy.
//!
//! Provides `/noaa` (latest readings) and `/stations` (catalog listing),
//! both JSON with permissive CORS headers.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
