//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Liveness check
//! GET  /health/ready                     - Readiness check (Magento ping)
//!
//! # Pickers (also under /load-commerce-categories)
//! GET  /commerce-categories              - Flattened category list
//! GET  /search-categories?query=         - Category name search
//! GET  /commerce-products?categoryUid=   - Products in a category
//! GET  /search-products?query=           - Product name search
//!
//! # Custom fields
//! GET  /custom-fields                    - Registered field kinds
//! POST /custom-fields/{name}/normalize   - Canonical stored value
//! ```

pub mod categories;
pub mod fields;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Prefix the admin widgets historically call the picker routes under.
pub const PLUGIN_PREFIX: &str = "/load-commerce-categories";

/// Optional free-text search parameter.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Create the picker routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/commerce-categories", get(categories::index))
        .route("/search-categories", get(categories::search))
        .route("/commerce-products", get(products::by_category))
        .route("/search-products", get(products::search))
}

/// Create the custom field routes router.
pub fn field_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(fields::index))
        .route("/{name}/normalize", post(fields::normalize))
}

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(catalog_routes())
        .nest(PLUGIN_PREFIX, catalog_routes())
        .nest("/custom-fields", field_routes())
}
