//! Picker option DTOs.
//!
//! These are the `{label, value}` shapes the admin-panel select widgets
//! consume. They carry no identity beyond the upstream UID or SKU.

use serde::{Deserialize, Serialize};

use super::id::{CategoryUid, Sku};

/// Character repeated once per tree depth in front of nested category names.
pub const INDENT_MARK: char = '—';

/// Indentation prefix for a category at the given tree depth.
///
/// Top-level categories get no prefix; deeper ones get one [`INDENT_MARK`]
/// per level followed by a single space.
///
/// ```
/// use commerce_fields_core::indent_prefix;
///
/// assert_eq!(indent_prefix(0), "");
/// assert_eq!(indent_prefix(2), "—— ");
/// ```
#[must_use]
pub fn indent_prefix(depth: usize) -> String {
    if depth == 0 {
        return String::new();
    }
    let mut prefix: String = std::iter::repeat_n(INDENT_MARK, depth).collect();
    prefix.push(' ');
    prefix
}

/// Strip a leading indentation run (and the whitespace after it) from a label.
#[must_use]
pub fn strip_indent(label: &str) -> &str {
    let rest = label.trim_start_matches(INDENT_MARK);
    if rest.len() == label.len() {
        return label;
    }
    rest.trim_start()
}

/// A category entry in the flattened, indented category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    /// Indented display label.
    pub label: String,
    /// Magento category UID.
    pub value: CategoryUid,
    /// Magento's own tree level for the category (not the display depth).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
}

impl CategoryOption {
    /// Build an option for a category visited at `depth` in the tree walk.
    #[must_use]
    pub fn at_depth(name: &str, uid: CategoryUid, level: Option<i64>, depth: usize) -> Self {
        Self {
            label: format!("{}{name}", indent_prefix(depth)),
            value: uid,
            level,
        }
    }

    /// The label without its indentation prefix.
    #[must_use]
    pub fn plain_label(&self) -> &str {
        strip_indent(&self.label)
    }

    /// Case-insensitive substring match against the de-indented label.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.plain_label().to_lowercase().contains(needle)
    }
}

/// A product entry for the product pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Product name.
    pub label: String,
    /// Product SKU, used as the stored value.
    pub value: Sku,
    /// SKU repeated for display; only set on search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
}

impl ProductOption {
    /// Option as returned by category listings.
    #[must_use]
    pub const fn listing(label: String, value: Sku) -> Self {
        Self {
            label,
            value,
            sku: None,
        }
    }

    /// Option as returned by searches, with the SKU echoed for display.
    #[must_use]
    pub fn search_hit(label: String, value: Sku) -> Self {
        Self {
            label,
            sku: Some(value.clone()),
            value,
        }
    }
}
