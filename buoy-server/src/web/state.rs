//! Application state for the web layer.

use std::sync::Arc;

use crate::ndbc::NdbcSource;
use crate::readings::Readings;

/// Shared application state.
pub struct AppState<S> {
    /// Station readings, including the metadata cache
    pub readings: Arc<Readings<S>>,
}

impl<S: NdbcSource> AppState<S> {
    /// Create a new app state reading from `source`.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            readings: Arc::new(Readings::new(source)),
        }
    }
}

// Manual impl: a derive would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            readings: self.readings.clone(),
        }
    }
}
