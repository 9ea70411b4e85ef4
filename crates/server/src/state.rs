//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::magento::{MagentoClient, MagentoError};
use crate::services::CatalogService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: CatalogService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Magento client cannot be built from the
    /// configuration.
    pub fn new(config: ServerConfig) -> Result<Self, MagentoError> {
        let client = MagentoClient::new(&config.magento)?;
        let catalog = CatalogService::new(client, config.magento.fail_open);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
