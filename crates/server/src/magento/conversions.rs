//! Conversion from Magento wire types to picker options.

use commerce_fields_core::{CategoryOption, CategoryUid, ProductOption, Sku};
use tracing::debug;

use super::types::{CategoryNode, ProductItem};

// =============================================================================
// Categories
// =============================================================================

/// Flatten a category tree into an indented option list.
///
/// Depth-first, parents before their children, siblings in input order.
/// Hidden categories are dropped together with their whole subtree.
#[must_use]
pub fn flatten_categories(nodes: &[CategoryNode]) -> Vec<CategoryOption> {
    let mut options = Vec::new();
    push_categories(nodes, 0, &mut options);
    options
}

fn push_categories(nodes: &[CategoryNode], depth: usize, out: &mut Vec<CategoryOption>) {
    for node in nodes {
        if !node.is_visible() {
            continue;
        }

        let Some(uid) = node.uid.as_deref() else {
            debug!(name = ?node.name, "Skipping category without uid");
            continue;
        };

        out.push(CategoryOption::at_depth(
            node.name.as_deref().unwrap_or_default(),
            CategoryUid::new(uid),
            node.level,
            depth,
        ));

        push_categories(&node.children, depth + 1, out);
    }
}

// =============================================================================
// Products
// =============================================================================

/// Products listed under a category.
#[must_use]
pub fn convert_listing(items: Vec<ProductItem>) -> Vec<ProductOption> {
    convert_products(items, ProductOption::listing)
}

/// Products returned by a search; the SKU is echoed for display.
#[must_use]
pub fn convert_search(items: Vec<ProductItem>) -> Vec<ProductOption> {
    convert_products(items, ProductOption::search_hit)
}

fn convert_products(
    items: Vec<ProductItem>,
    build: fn(String, Sku) -> ProductOption,
) -> Vec<ProductOption> {
    items
        .into_iter()
        .filter_map(|item| {
            let Some(sku) = item.sku.filter(|sku| !sku.is_empty()) else {
                debug!(name = ?item.name, "Skipping product without sku");
                return None;
            };
            // Unnamed products fall back to their SKU so the picker never shows a blank row
            let label = item.name.unwrap_or_else(|| sku.clone());
            Some(build(label, Sku::new(sku)))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::magento::types::CategoryResult;

    fn tree() -> Vec<CategoryNode> {
        let result: CategoryResult = serde_json::from_value(json!({
            "items": [
                {
                    "uid": "MjA=", "name": "Women", "level": 2, "include_in_menu": 1,
                    "children": [
                        {
                            "uid": "MjE=", "name": "Tops", "level": 3, "include_in_menu": 1,
                            "children": [
                                {"uid": "MjU=", "name": "Tees", "level": 4, "include_in_menu": 1},
                                {"uid": "MjQ=", "name": "Hoodies", "level": 4, "include_in_menu": "0"}
                            ]
                        },
                        {
                            "uid": "MjI=", "name": "Bottoms", "level": 3, "include_in_menu": false,
                            "children": [
                                {"uid": "Mjc=", "name": "Shorts", "level": 4, "include_in_menu": 1}
                            ]
                        }
                    ]
                },
                {"uid": "Mw==", "name": "Gear", "level": 2, "include_in_menu": true},
                {"uid": "Mzc=", "name": "Sale", "level": 2, "include_in_menu": 0}
            ]
        }))
        .unwrap();
        result.items
    }

    #[test]
    fn test_flatten_depth_first_with_indentation() {
        let options = flatten_categories(&tree());
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();

        assert_eq!(labels, vec!["Women", "— Tops", "—— Tees", "Gear"]);
    }

    #[test]
    fn test_flatten_keeps_magento_level() {
        let options = flatten_categories(&tree());
        let levels: Vec<Option<i64>> = options.iter().map(|o| o.level).collect();

        assert_eq!(levels, vec![Some(2), Some(3), Some(4), Some(2)]);
        assert_eq!(options[2].value, CategoryUid::new("MjU="));
    }

    #[test]
    fn test_hidden_parent_hides_subtree() {
        let options = flatten_categories(&tree());

        assert!(!options.iter().any(|o| o.plain_label() == "Bottoms"));
        assert!(!options.iter().any(|o| o.plain_label() == "Shorts"));
        assert!(!options.iter().any(|o| o.plain_label() == "Sale"));
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten_categories(&[]).is_empty());
    }

    #[test]
    fn test_convert_products() {
        let items = vec![
            ProductItem {
                sku: Some("24-MB01".to_string()),
                name: Some("Joust Duffle Bag".to_string()),
            },
            ProductItem {
                sku: None,
                name: Some("Ghost".to_string()),
            },
            ProductItem {
                sku: Some("24-UG06".to_string()),
                name: None,
            },
        ];

        let listing = convert_listing(items.clone());
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].label, "Joust Duffle Bag");
        assert_eq!(listing[0].sku, None);
        assert_eq!(listing[1].label, "24-UG06");

        let search = convert_search(items);
        assert_eq!(search[0].sku, Some(Sku::new("24-MB01")));
    }
}
