//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::youtube::VideoSource;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Video source shared by every analysis
    pub source: Arc<dyn VideoSource>,
    /// Read-only configuration (analysis defaults, theme, page size)
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given source and configuration.
    pub fn new(source: Arc<dyn VideoSource>, config: AppConfig) -> Self {
        Self {
            source,
            config: Arc::new(config),
        }
    }
}
