//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{ConfigError, MarketConfig};
use crate::supabase::SupabaseClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration and the
/// anonymous-key client; the privileged service-role client is never part
/// of route-layer state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MarketConfig,
    db: SupabaseClient,
}

impl AppState {
    /// Build state from configuration, constructing the anonymous client.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the anonymous client cannot be built
    /// from the configured key.
    pub fn new(config: MarketConfig) -> Result<Self, ConfigError> {
        let db = SupabaseClient::anon(&config)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, db }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.inner.config
    }

    /// Get a reference to the anonymous-key service client.
    #[must_use]
    pub fn db(&self) -> &SupabaseClient {
        &self.inner.db
    }
}
