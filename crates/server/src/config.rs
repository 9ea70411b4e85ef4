//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `COMMERCE_FIELDS_HOST` - Bind address (default: 127.0.0.1)
//! - `COMMERCE_FIELDS_PORT` - Listen port (default: 3000)
//! - `COMMERCE_FIELDS_CORS_ORIGINS` - Comma-separated allowed origins (default: any)
//! - `MAGENTO_GRAPHQL_ENDPOINT` - Magento GraphQL URL (default: <https://magento.test/graphql>)
//! - `MAGENTO_CACHE_TIMEOUT` - Cache TTL in seconds, 0 disables (default: 3600)
//! - `MAGENTO_ACCEPT_INVALID_CERTS` - Skip TLS verification for Magento only (default: false)
//! - `MAGENTO_REQUEST_TIMEOUT` - Upstream request timeout in seconds (default: 30)
//! - `MAGENTO_ROOT_CATEGORY_ID` - Parent id of the top-level categories (default: 2)
//! - `MAGENTO_STORE_CODE` - Store view code sent as the `Store` header
//! - `MAGENTO_ACCESS_TOKEN` - Bearer token for stores that restrict GraphQL
//! - `MAGENTO_FAIL_OPEN` - Answer upstream failures with empty lists (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://magento.test/graphql";
const DEFAULT_CACHE_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ROOT_CATEGORY_ID: &str = "2";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origins allowed to call the API from a browser; empty allows any
    pub cors_origins: Vec<String>,
    /// Magento GraphQL configuration
    pub magento: MagentoConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Magento GraphQL API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct MagentoConfig {
    /// Magento GraphQL endpoint
    pub graphql_endpoint: Url,
    /// How long fetched categories and product listings stay cached
    pub cache_timeout: Duration,
    /// Disable certificate verification on the Magento client only
    pub accept_invalid_certs: bool,
    /// Upstream request timeout
    pub request_timeout: Duration,
    /// Parent id passed to the category tree query
    pub root_category_id: String,
    /// Store view code
    pub store_code: Option<String>,
    /// Integration bearer token
    pub access_token: Option<SecretString>,
    /// Degrade upstream failures to empty results instead of erroring
    pub fail_open: bool,
}

impl std::fmt::Debug for MagentoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagentoConfig")
            .field("graphql_endpoint", &self.graphql_endpoint.as_str())
            .field("cache_timeout", &self.cache_timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("request_timeout", &self.request_timeout)
            .field("root_category_id", &self.root_category_id)
            .field("store_code", &self.store_code)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("fail_open", &self.fail_open)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// access token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(env, "COMMERCE_FIELDS_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(env, "COMMERCE_FIELDS_PORT", 3000_u16)?;
        let cors_origins = env("COMMERCE_FIELDS_CORS_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            cors_origins,
            magento: MagentoConfig::from_lookup(env)?,
            sentry_dsn: non_empty(env, "SENTRY_DSN"),
            sentry_environment: non_empty(env, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MagentoConfig {
    /// Configuration for `endpoint` with every other setting at its default.
    #[must_use]
    pub fn for_endpoint(endpoint: Url) -> Self {
        Self {
            graphql_endpoint: endpoint,
            cache_timeout: Duration::from_secs(DEFAULT_CACHE_TIMEOUT_SECS),
            accept_invalid_certs: false,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            root_category_id: DEFAULT_ROOT_CATEGORY_ID.to_string(),
            store_code: None,
            access_token: None,
            fail_open: true,
        }
    }

    /// Whether responses should be cached at all.
    #[must_use]
    pub const fn cache_enabled(&self) -> bool {
        !self.cache_timeout.is_zero()
    }

    fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let graphql_endpoint = parse_endpoint(
            &non_empty(env, "MAGENTO_GRAPHQL_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_ENDPOINT.to_string()),
        )?;

        let access_token = match non_empty(env, "MAGENTO_ACCESS_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "MAGENTO_ACCESS_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            graphql_endpoint,
            cache_timeout: Duration::from_secs(parse_or_default(
                env,
                "MAGENTO_CACHE_TIMEOUT",
                DEFAULT_CACHE_TIMEOUT_SECS,
            )?),
            accept_invalid_certs: parse_bool_or_default(
                env,
                "MAGENTO_ACCEPT_INVALID_CERTS",
                false,
            )?,
            request_timeout: Duration::from_secs(parse_or_default(
                env,
                "MAGENTO_REQUEST_TIMEOUT",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            root_category_id: non_empty(env, "MAGENTO_ROOT_CATEGORY_ID")
                .unwrap_or_else(|| DEFAULT_ROOT_CATEGORY_ID.to_string()),
            store_code: non_empty(env, "MAGENTO_STORE_CODE"),
            access_token,
            fail_open: parse_bool_or_default(env, "MAGENTO_FAIL_OPEN", true)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable, treating blank values as unset.
fn non_empty(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_or_default<T>(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(env, key).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
fn parse_bool_or_default(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = non_empty(env, key) else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Parse and validate the GraphQL endpoint URL.
fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    const KEY: &str = "MAGENTO_GRAPHQL_ENDPOINT";

    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(KEY.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            KEY.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            KEY.to_string(),
            "endpoint must have a host".to_string(),
        ));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Magento integration tokens are 32 random alphanumerics
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token Magento generated."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(&lookup(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.cors_origins.is_empty());
        assert_eq!(
            config.magento.graphql_endpoint.as_str(),
            "https://magento.test/graphql"
        );
        assert_eq!(config.magento.cache_timeout, Duration::from_secs(3600));
        assert_eq!(config.magento.root_category_id, "2");
        assert!(!config.magento.accept_invalid_certs);
        assert!(config.magento.fail_open);
        assert!(config.magento.cache_enabled());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(&lookup(&[
            ("COMMERCE_FIELDS_PORT", "1337"),
            ("COMMERCE_FIELDS_CORS_ORIGINS", "http://localhost:1337, ,https://cms.example"),
            ("MAGENTO_GRAPHQL_ENDPOINT", "https://shop.test/graphql"),
            ("MAGENTO_CACHE_TIMEOUT", "0"),
            ("MAGENTO_ACCEPT_INVALID_CERTS", "yes"),
            ("MAGENTO_STORE_CODE", "default"),
            ("MAGENTO_FAIL_OPEN", "false"),
        ]))
        .unwrap();

        assert_eq!(config.port, 1337);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:1337", "https://cms.example"]
        );
        assert_eq!(config.magento.graphql_endpoint.host_str(), Some("shop.test"));
        assert!(!config.magento.cache_enabled());
        assert!(config.magento.accept_invalid_certs);
        assert_eq!(config.magento.store_code.as_deref(), Some("default"));
        assert!(!config.magento.fail_open);
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = ServerConfig::from_lookup(&lookup(&[("MAGENTO_GRAPHQL_ENDPOINT", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "MAGENTO_GRAPHQL_ENDPOINT"));

        let err = ServerConfig::from_lookup(&lookup(&[("MAGENTO_GRAPHQL_ENDPOINT", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_bool() {
        let err = ServerConfig::from_lookup(&lookup(&[("MAGENTO_FAIL_OPEN", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "MAGENTO_FAIL_OPEN"));
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = ServerConfig::from_lookup(&lookup(&[(
            "MAGENTO_ACCESS_TOKEN",
            "your-integration-token",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_low_entropy_token_rejected() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ServerConfig::from_lookup(&lookup(&[(
            "MAGENTO_ACCESS_TOKEN",
            "q8z1n4k0v7m2c9x3b6l5j8h1g4f7d2s0",
        )]))
        .unwrap();

        let debug_output = format!("{:?}", config.magento);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("q8z1n4k0v7m2c9x3b6l5j8h1g4f7d2s0"));
    }
}
