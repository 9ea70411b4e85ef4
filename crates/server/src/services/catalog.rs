//! Catalog service backing the picker endpoints.
//!
//! Wraps [`MagentoClient`] with the picker semantics: result limits, the
//! empty-query defaults, and the upstream failure policy. When the service
//! fails open, an upstream error is logged and answered with an empty list
//! so the widgets render an empty dropdown instead of an error.

use commerce_fields_core::{CategoryOption, CategoryUid, ProductOption};
use tracing::instrument;

use crate::magento::{MagentoClient, MagentoError};

/// Maximum categories returned by a category search.
pub const CATEGORY_SEARCH_LIMIT: usize = 20;
/// Page size requested from Magento for product searches.
pub const PRODUCT_SEARCH_PAGE_SIZE: i64 = 20;
/// Products returned when the search box is still empty.
pub const DEFAULT_PRODUCT_LIMIT: usize = 10;

/// Category and product operations for the pickers.
#[derive(Clone)]
pub struct CatalogService {
    client: MagentoClient,
    fail_open: bool,
}

impl CatalogService {
    /// Create a service over `client`.
    #[must_use]
    pub const fn new(client: MagentoClient, fail_open: bool) -> Self {
        Self { client, fail_open }
    }

    /// The underlying Magento client.
    #[must_use]
    pub const fn client(&self) -> &MagentoClient {
        &self.client
    }

    /// Every visible category, flattened and indented.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream call fails and the service does not
    /// fail open.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<CategoryOption>, MagentoError> {
        self.recover("categories", self.client.categories().await)
    }

    /// Categories whose de-indented name contains `query`, case-insensitively.
    ///
    /// An absent or empty query returns the first categories of the full
    /// list. Whitespace is part of the query.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogService::categories`].
    #[instrument(skip(self))]
    pub async fn search_categories(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<CategoryOption>, MagentoError> {
        let all = self.categories().await?;
        Ok(filter_categories(all, query, CATEGORY_SEARCH_LIMIT))
    }

    /// Products assigned to a category.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogService::categories`].
    #[instrument(skip(self), fields(category_uid = %category_uid))]
    pub async fn products_by_category(
        &self,
        category_uid: &CategoryUid,
    ) -> Result<Vec<ProductOption>, MagentoError> {
        self.recover(
            "category products",
            self.client.products_by_category(category_uid).await,
        )
    }

    /// Products matching `query`.
    ///
    /// An absent or empty query runs an unfiltered search and keeps only the
    /// first few results, enough to seed the dropdown. Any other query is
    /// sent to Magento as typed.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogService::categories`].
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<ProductOption>, MagentoError> {
        match non_empty(query) {
            Some(term) => self.recover(
                "product search",
                self.client
                    .search_products(term, PRODUCT_SEARCH_PAGE_SIZE)
                    .await,
            ),
            None => {
                let mut products = self.recover(
                    "default products",
                    self.client
                        .search_products("", PRODUCT_SEARCH_PAGE_SIZE)
                        .await,
                )?;
                products.truncate(DEFAULT_PRODUCT_LIMIT);
                Ok(products)
            }
        }
    }

    /// Check the upstream is reachable. Never fails open.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream call fails.
    pub async fn ping(&self) -> Result<(), MagentoError> {
        self.client.ping().await
    }

    fn recover<T>(
        &self,
        what: &str,
        result: Result<Vec<T>, MagentoError>,
    ) -> Result<Vec<T>, MagentoError> {
        match result {
            Err(error) if self.fail_open => {
                tracing::error!(%error, "Error fetching Magento {what} via GraphQL");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

/// The query, or `None` when it is absent or empty.
fn non_empty(query: Option<&str>) -> Option<&str> {
    query.filter(|q| !q.is_empty())
}

/// Keep categories whose plain label contains `query`, up to `limit`.
#[must_use]
pub fn filter_categories(
    categories: Vec<CategoryOption>,
    query: Option<&str>,
    limit: usize,
) -> Vec<CategoryOption> {
    let Some(query) = non_empty(query) else {
        return categories.into_iter().take(limit).collect();
    };

    let needle = query.to_lowercase();
    categories
        .into_iter()
        .filter(|category| category.matches_lowercase(&needle))
        .take(limit)
        .collect()
}
