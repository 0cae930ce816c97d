//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::config::StorefrontConfig;
use crate::gemini::{GeminiClient, GeminiError};
use crate::services::Concierge;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Each slice (catalog, concierge) owns its
/// own locking; handlers never hold more than one at a time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    gemini: GeminiClient,
    concierge: Concierge,
}

impl AppState {
    /// Create a new application state around a loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be built.
    pub fn new(config: StorefrontConfig, catalog: CatalogStore) -> Result<Self, GeminiError> {
        let gemini = GeminiClient::new(&config.gemini)?;
        let concierge = Concierge::new(gemini.clone());
        Ok(Self::from_parts(config, catalog, gemini, concierge))
    }

    /// Assemble state from pre-built parts.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        catalog: CatalogStore,
        gemini: GeminiClient,
        concierge: Concierge,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                gemini,
                concierge,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the Gemini API client.
    #[must_use]
    pub fn gemini(&self) -> &GeminiClient {
        &self.inner.gemini
    }

    /// Get a reference to the concierge registry.
    #[must_use]
    pub fn concierge(&self) -> &Concierge {
        &self.inner.concierge
    }
}
