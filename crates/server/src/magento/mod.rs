//! Magento GraphQL API client.
//!
//! # Architecture
//!
//! - `graphql_client` request/response envelopes, `reqwest` for HTTP
//! - Magento is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for category and listing responses
//!   (TTL from `MAGENTO_CACHE_TIMEOUT`)
//! - TLS verification can be relaxed per client, never process-wide
//!
//! # Queries
//!
//! - `CategoryTree` - three levels of categories below the root category
//! - `ProductsByCategory` - products assigned to one category UID
//! - `SearchProducts` - full-text product search
//! - `Ping` - `__typename` round trip for readiness checks
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_fields_server::magento::MagentoClient;
//!
//! let client = MagentoClient::new(&config.magento)?;
//!
//! let categories = client.categories().await?;
//! let products = client.products_by_category(&categories[0].value).await?;
//! ```

mod cache;
mod client;
pub mod conversions;
pub mod queries;
pub mod types;

pub use client::MagentoClient;

use thiserror::Error;

/// Errors that can occur when talking to Magento.
#[derive(Debug, Error)]
pub enum MagentoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Magento answered with a non-success status.
    #[error("HTTP error! status: {status}, body: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The client could not be built from configuration.
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// A GraphQL error returned by the Magento API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
