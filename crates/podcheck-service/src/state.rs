//! Application state.

use std::sync::Arc;

use podcheck_store::RocksStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        if config.moderator_api_key.is_none() {
            tracing::warn!("Moderator key not configured - moderation endpoints will reject all requests");
        }

        Self { store, config }
    }

    /// Check if moderation is configured.
    #[must_use]
    pub fn has_moderation(&self) -> bool {
        self.config.moderator_api_key.is_some()
    }
}
