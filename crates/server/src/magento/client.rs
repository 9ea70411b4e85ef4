//! Magento GraphQL client implementation.
//!
//! Uses `graphql_client` envelopes with `reqwest` for HTTP. Caches the
//! flattened category list and per-category product listings using `moka`.

use std::sync::Arc;

use commerce_fields_core::{CategoryOption, CategoryUid, ProductOption};
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use reqwest::header::{self, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};
use url::Url;

use crate::config::MagentoConfig;

use super::cache::{CacheKey, CacheValue};
use super::conversions::{convert_listing, convert_search, flatten_categories};
use super::queries::{
    CategoryTree, Ping, ProductsByCategory, SearchProducts, category_tree, ping,
    products_by_category, search_products,
};
use super::{GraphQLError, GraphQLErrorLocation, MagentoError};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const MAX_CACHE_ENTRIES: u64 = 1000;
const LOGGED_BODY_CHARS: usize = 500;
const ERROR_BODY_CHARS: usize = 200;

/// Magento's default page size, used for category listings.
pub const CATEGORY_PAGE_SIZE: i64 = 20;

// =============================================================================
// MagentoClient
// =============================================================================

/// Client for the Magento GraphQL API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct MagentoClient {
    inner: Arc<MagentoClientInner>,
}

struct MagentoClientInner {
    client: reqwest::Client,
    endpoint: Url,
    root_category_id: String,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl MagentoClient {
    /// Create a new Magento API client.
    ///
    /// Certificate verification is only relaxed on this client's own
    /// connections when `accept_invalid_certs` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured header value is not valid or the
    /// HTTP client cannot be built.
    pub fn new(config: &MagentoConfig) -> Result<Self, MagentoError> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers(config)?)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        if config.accept_invalid_certs {
            tracing::warn!(
                endpoint = %config.graphql_endpoint,
                "TLS certificate verification disabled for Magento requests"
            );
        }

        let cache = config.cache_enabled().then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(config.cache_timeout)
                .build()
        });

        Ok(Self {
            inner: Arc::new(MagentoClientInner {
                client,
                endpoint: config.graphql_endpoint.clone(),
                root_category_id: config.root_category_id.clone(),
                cache,
            }),
        })
    }

    /// The configured GraphQL endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, MagentoError> {
        let request_body = Q::build_query(variables);
        debug!(operation = request_body.operation_name, "Sending GraphQL query");

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, LOGGED_BODY_CHARS),
                "Magento API returned non-success status"
            );
            return Err(MagentoError::Status {
                status: status.as_u16(),
                body: truncate(&response_text, ERROR_BODY_CHARS),
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&response_text, LOGGED_BODY_CHARS),
                    "Failed to parse Magento GraphQL response"
                );
                return Err(MagentoError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(MagentoError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %truncate(&response_text, LOGGED_BODY_CHARS),
                "Magento GraphQL response has no data and no errors"
            );
            MagentoError::GraphQL(vec![GraphQLError::message("No data in response")])
        })
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Round-trip a trivial query to check the upstream is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), MagentoError> {
        let data = self.execute::<Ping>(ping::Variables {}).await?;
        debug!(typename = %data.typename, "Magento ping ok");
        Ok(())
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Get the flattened, indented category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<CategoryOption>, MagentoError> {
        if let Some(CacheValue::Categories(categories)) = self.cached(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let variables = category_tree::Variables {
            parent_id: self.inner.root_category_id.clone(),
        };

        let data = self.execute::<CategoryTree>(variables).await?;

        let categories = data
            .categories
            .map(|result| flatten_categories(&result.items))
            .unwrap_or_default();
        debug!(count = categories.len(), "Fetched categories");

        self.store(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the products assigned to a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_uid = %category_uid))]
    pub async fn products_by_category(
        &self,
        category_uid: &CategoryUid,
    ) -> Result<Vec<ProductOption>, MagentoError> {
        let cache_key = CacheKey::CategoryProducts(category_uid.clone());

        if let Some(CacheValue::Products(products)) = self.cached(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let variables = products_by_category::Variables {
            category_uid: category_uid.to_string(),
            page_size: CATEGORY_PAGE_SIZE,
        };

        let data = self.execute::<ProductsByCategory>(variables).await?;

        let products = convert_listing(data.products.unwrap_or_default().items);

        self.store(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Search products by name. Search results are never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        search: &str,
        page_size: i64,
    ) -> Result<Vec<ProductOption>, MagentoError> {
        let variables = search_products::Variables {
            search: search.to_string(),
            page_size,
        };

        let data = self.execute::<SearchProducts>(variables).await?;

        Ok(convert_search(data.products.unwrap_or_default().items))
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
            cache.run_pending_tasks().await;
        }
    }
}

fn default_headers(config: &MagentoConfig) -> Result<HeaderMap, MagentoError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(store) = &config.store_code {
        let value = HeaderValue::from_str(store)
            .map_err(|e| MagentoError::Config(format!("invalid store code: {e}")))?;
        headers.insert("store", value);
    }

    if let Some(token) = &config.access_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| MagentoError::Config(format!("invalid access token: {e}")))?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    Ok(headers)
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn config_for(server: &MockServer) -> MagentoConfig {
        MagentoConfig::for_endpoint(Url::parse(&server.url("/graphql")).unwrap())
    }

    fn category_response() -> serde_json::Value {
        json!({
            "data": {
                "categories": {
                    "total_count": 2,
                    "items": [
                        {
                            "uid": "MTE=", "name": "Men", "level": 2, "include_in_menu": 1,
                            "children": [
                                {"uid": "MTI=", "name": "Tops", "level": 3, "include_in_menu": 1, "children": []}
                            ]
                        },
                        {"uid": "Mw==", "name": "Gear", "level": 2, "include_in_menu": 0, "children": []}
                    ]
                }
            }
        })
    }

    #[tokio::test]
    async fn test_categories_are_flattened_and_cached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/graphql")
                    .body_contains("CategoryTree")
                    .body_contains("\"parentId\":\"2\"");
                then.status(200).json_body(category_response());
            })
            .await;

        let client = MagentoClient::new(&config_for(&server)).unwrap();

        let first = client.categories().await.unwrap();
        let second = client.categories().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].label, "— Tops");
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_cache_disabled_refetches() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(200).json_body(category_response());
            })
            .await;

        let mut config = config_for(&server);
        config.cache_timeout = Duration::ZERO;
        let client = MagentoClient::new(&config).unwrap();

        client.categories().await.unwrap();
        client.categories().await.unwrap();

        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_invalidate_all_forces_refetch() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(200).json_body(category_response());
            })
            .await;

        let client = MagentoClient::new(&config_for(&server)).unwrap();

        client.categories().await.unwrap();
        client.invalidate_all().await;
        client.categories().await.unwrap();

        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_search_sends_variables_and_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/graphql")
                    .header("store", "default")
                    .header("accept", "application/json")
                    .body_contains("SearchProducts")
                    .body_contains("\"search\":\"duffle\"")
                    .body_contains("\"pageSize\":20");
                then.status(200).json_body(json!({
                    "data": {"products": {"items": [{"sku": "24-MB01", "name": "Joust Duffle Bag"}]}}
                }));
            })
            .await;

        let mut config = config_for(&server);
        config.store_code = Some("default".to_string());
        let client = MagentoClient::new(&config).unwrap();

        let products = client.search_products("duffle", 20).await.unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].value.as_str(), "24-MB01");
        assert_eq!(products[0].sku.as_ref().map(|s| s.as_str()), Some("24-MB01"));
    }

    #[tokio::test]
    async fn test_products_by_category() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/graphql")
                    .body_contains("\"categoryUid\":\"MjA=\"");
                then.status(200).json_body(json!({
                    "data": {"products": {"items": [
                        {"sku": "WJ12", "name": "Olivia 1/4 Zip Light Jacket"},
                        null
                    ]}}
                }));
            })
            .await;

        let client = MagentoClient::new(&config_for(&server)).unwrap();
        let products = client
            .products_by_category(&CategoryUid::new("MjA="))
            .await
            .unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].label, "Olivia 1/4 Zip Light Jacket");
        assert_eq!(products[0].sku, None);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(503).body("maintenance");
            })
            .await;

        let client = MagentoClient::new(&config_for(&server)).unwrap();
        let err = client.categories().await.unwrap_err();

        assert!(matches!(err, MagentoError::Status { status: 503, ref body } if body == "maintenance"));
    }

    #[tokio::test]
    async fn test_graphql_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(200).json_body(json!({
                    "errors": [{
                        "message": "Variable \"$search\" got invalid value",
                        "locations": [{"line": 2, "column": 21}],
                        "path": ["products"]
                    }],
                    "data": null
                }));
            })
            .await;

        let client = MagentoClient::new(&config_for(&server)).unwrap();
        let err = client.search_products("", 20).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "GraphQL errors: Variable \"$search\" got invalid value path: products at line 2:21"
        );
    }

    #[tokio::test]
    async fn test_unparsable_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(200).body("<html>not graphql</html>");
            })
            .await;

        let client = MagentoClient::new(&config_for(&server)).unwrap();
        let err = client.ping().await.unwrap_err();

        assert!(matches!(err, MagentoError::Parse(_)));
    }

    #[test]
    fn test_invalid_store_code_rejected() {
        let mut config = MagentoConfig::for_endpoint(Url::parse("http://localhost/graphql").unwrap());
        config.store_code = Some("bad\nvalue".to_string());

        assert!(matches!(
            MagentoClient::new(&config),
            Err(MagentoError::Config(_))
        ));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("——————", 2), "——");
        assert_eq!(truncate("ok", 10), "ok");
    }
}
