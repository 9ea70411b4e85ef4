//! Integration test harness for the commerce fields server.
//!
//! Each [`TestContext`] starts a mock Magento GraphQL endpoint and the real
//! application router on an ephemeral port, wired together through the same
//! environment-variable configuration the binary uses.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p commerce-fields-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;

use commerce_fields_server::config::{ConfigError, ServerConfig};
use commerce_fields_server::state::AppState;
use httpmock::MockServer;
use serde_json::{Value, json};

/// Errors raised while starting a test context.
pub type SetupError = Box<dyn std::error::Error + Send + Sync>;

/// A running server wired to a mock Magento.
pub struct TestContext {
    pub magento: MockServer,
    pub client: reqwest::Client,
    pub addr: SocketAddr,
}

impl TestContext {
    /// Start a server that degrades upstream failures to empty lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be configured or bound.
    pub async fn new() -> Result<Self, SetupError> {
        Self::with_env(&[]).await
    }

    /// Start a server with extra configuration variables.
    ///
    /// `MAGENTO_GRAPHQL_ENDPOINT` always points at the mock.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be configured or bound.
    pub async fn with_env(vars: &[(&str, &str)]) -> Result<Self, SetupError> {
        let magento = MockServer::start_async().await;

        let mut env: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        env.insert("MAGENTO_GRAPHQL_ENDPOINT".to_string(), magento.url("/graphql"));

        let config = load_config(&env)?;
        let state = AppState::new(config)?;
        let app = commerce_fields_server::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            magento,
            client: reqwest::Client::new(),
            addr,
        })
    }

    /// Absolute URL for `path` on the running server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET `path` and return the status with the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> Result<(u16, Value), SetupError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }
}

fn load_config(env: &HashMap<String, String>) -> Result<ServerConfig, ConfigError> {
    ServerConfig::from_lookup(&|key: &str| env.get(key).cloned())
}

// ============================================================================
// Magento fixtures
// ============================================================================

/// `CategoryTree` response modelled on the Luma sample catalog.
#[must_use]
pub fn luma_categories() -> Value {
    json!({"data": {"categories": {"total_count": 3, "items": [
        {
            "uid": "MjA=", "name": "Women", "level": 2, "include_in_menu": 1,
            "children": [
                {
                    "uid": "MjE=", "name": "Tops", "level": 3, "include_in_menu": 1,
                    "children": [
                        {"uid": "MjM=", "name": "Jackets", "level": 4, "include_in_menu": 1},
                        {"uid": "MjU=", "name": "Tees", "level": 4, "include_in_menu": 1}
                    ]
                },
                {"uid": "MjI=", "name": "Bottoms", "level": 3, "include_in_menu": 1}
            ]
        },
        {
            "uid": "Mw==", "name": "Gear", "level": 2, "include_in_menu": 1,
            "children": [
                {"uid": "NA==", "name": "Bags", "level": 3, "include_in_menu": 1}
            ]
        },
        {
            "uid": "Mzc=", "name": "Sale", "level": 2, "include_in_menu": 0,
            "children": [
                {"uid": "Mzg=", "name": "Clearance Tees", "level": 3, "include_in_menu": 1}
            ]
        }
    ]}}})
}

/// Products response with `count` generated items.
#[must_use]
pub fn products(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| json!({"sku": format!("24-MB{i:02}"), "name": format!("Bag {i}")}))
        .collect();
    json!({"data": {"products": {"total_count": count, "items": items}}})
}
