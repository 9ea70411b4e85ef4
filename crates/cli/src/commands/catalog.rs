//! Catalog commands backed by the Magento GraphQL API.
//!
//! # Environment Variables
//!
//! Same as the server; `MAGENTO_GRAPHQL_ENDPOINT` selects the store.
//! `MAGENTO_FAIL_OPEN` is ignored here: upstream errors always fail the
//! command so they are visible.

use commerce_fields_core::CategoryUid;
use commerce_fields_server::config::{ConfigError, ServerConfig};
use commerce_fields_server::magento::{MagentoClient, MagentoError};
use commerce_fields_server::services::CatalogService;
use thiserror::Error;

use super::print_json;

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Magento(#[from] MagentoError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

fn catalog() -> Result<CatalogService, CatalogCommandError> {
    let config = ServerConfig::from_env()?;
    tracing::debug!(endpoint = %config.magento.graphql_endpoint, "Using Magento endpoint");
    let client = MagentoClient::new(&config.magento)?;
    Ok(CatalogService::new(client, false))
}

/// Print the flattened category list.
pub async fn categories() -> Result<(), CatalogCommandError> {
    let categories = catalog()?.categories().await?;
    print_json(&categories)?;
    Ok(())
}

/// Print categories matching `query`.
pub async fn search_categories(query: Option<&str>) -> Result<(), CatalogCommandError> {
    let categories = catalog()?.search_categories(query).await?;
    print_json(&categories)?;
    Ok(())
}

/// Print the products in a category.
pub async fn products(category: &str) -> Result<(), CatalogCommandError> {
    let products = catalog()?
        .products_by_category(&CategoryUid::new(category.trim()))
        .await?;
    print_json(&products)?;
    Ok(())
}

/// Print products matching `query`.
pub async fn search_products(query: Option<&str>) -> Result<(), CatalogCommandError> {
    let products = catalog()?.search_products(query).await?;
    print_json(&products)?;
    Ok(())
}

/// Check the Magento endpoint answers a trivial query.
pub async fn ping() -> Result<(), CatalogCommandError> {
    let catalog = catalog()?;
    catalog.ping().await?;
    tracing::info!(endpoint = %catalog.client().endpoint(), "Magento is reachable");
    print_json(&serde_json::json!({ "ok": true }))?;
    Ok(())
}
