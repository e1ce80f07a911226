//! Shared application state for the Axum server.

use std::sync::Arc;

use lv_log_tools::{LogService, ViewerConfig};

/// Shared application state, wrapped in `Arc` for Axum handler sharing.
///
/// Only read-only configuration and the source chain live here; every
/// request builds its own records.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LogService>,
}

impl AppState {
    pub fn new(service: LogService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// State for a validated retrieval config, using real processes or the
    /// sandbox boundary depending on its runtime mode.
    pub fn from_config(config: ViewerConfig) -> Self {
        Self::new(LogService::from_config(config))
    }
}
