//! Cache types for Magento API responses.

use commerce_fields_core::{CategoryOption, CategoryUid, ProductOption};

/// Cache key for categories and category product listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    CategoryProducts(CategoryUid),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Vec<CategoryOption>),
    Products(Vec<ProductOption>),
}
