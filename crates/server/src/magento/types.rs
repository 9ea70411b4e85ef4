//! Wire types for Magento GraphQL responses.
//!
//! Magento lists are nullable and may contain null entries; every list here
//! deserializes through [`nullable_list`] so callers only ever see the
//! non-null items.

use serde::{Deserialize, Deserializer};

/// Deserialize `null`, missing, or `[T | null]` into the non-null items.
pub fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

/// Magento's `include_in_menu` attribute.
///
/// The schema declares an `Int`, but EAV-backed stores and proxies have been
/// seen returning booleans and strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MenuFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl MenuFlag {
    /// `false`, `0`, `"0"` and `""` hide the category.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == "0"
            }
        }
    }
}

/// One node of the `CategoryTree` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryNode {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub level: Option<i64>,
    pub include_in_menu: Option<MenuFlag>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Whether the node (and therefore its subtree) shows in the picker.
    ///
    /// A missing flag counts as visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.include_in_menu.as_ref().is_some_and(MenuFlag::is_falsy)
    }
}

/// `categories` field of the `CategoryTree` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryResult {
    pub total_count: Option<i64>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub items: Vec<CategoryNode>,
}

/// One product of a `products` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductItem {
    pub sku: Option<String>,
    pub name: Option<String>,
}

/// `products` field of product responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductResult {
    pub total_count: Option<i64>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub items: Vec<ProductItem>,
}
