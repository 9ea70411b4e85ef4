//! Custom field kinds and their stored values.
//!
//! Each picker widget persists its selection in the CMS under one of four
//! field kinds. Stored values have drifted over time (single values where
//! arrays are expected now, JSON encoded as text, a legacy single-product
//! shape), so [`FieldValue::normalize`] folds every accepted shape into one
//! canonical value per kind.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::{CategoryUid, Sku};

/// Errors that can occur when normalizing a stored field value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldValueError {
    /// The field kind name is not one of the known kinds.
    #[error("unknown custom field: {0}")]
    UnknownKind(String),
    /// A string value was expected to contain JSON but did not parse.
    #[error("{kind} value is not valid JSON: {reason}")]
    InvalidJson {
        /// Field kind being normalized.
        kind: FieldKind,
        /// Parser error message.
        reason: String,
    },
    /// The value has a shape the field kind cannot hold.
    #[error("{kind} expects {expected}")]
    InvalidShape {
        /// Field kind being normalized.
        kind: FieldKind,
        /// Human readable description of the accepted shape.
        expected: &'static str,
    },
}

/// How the CMS stores a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    String,
    Json,
}

/// The four picker field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single category picker.
    CommerceCategoryInput,
    /// Multi category picker.
    CommerceCategoriesInput,
    /// Multi product picker.
    CommerceProductInput,
    /// Category picker with dependent product picker.
    CommerceCategoryProductInput,
}

impl FieldKind {
    /// Every field kind, in registration order.
    pub const ALL: [Self; 4] = [
        Self::CommerceCategoryInput,
        Self::CommerceCategoriesInput,
        Self::CommerceCategoryProductInput,
        Self::CommerceProductInput,
    ];

    /// Registered field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CommerceCategoryInput => "commerce_category_input",
            Self::CommerceCategoriesInput => "commerce_categories_input",
            Self::CommerceProductInput => "commerce_product_input",
            Self::CommerceCategoryProductInput => "commerce_category_product_input",
        }
    }

    /// Storage type the CMS uses for this field.
    #[must_use]
    pub const fn storage(self) -> StorageType {
        match self {
            Self::CommerceCategoryInput | Self::CommerceCategoryProductInput => {
                StorageType::String
            }
            Self::CommerceCategoriesInput | Self::CommerceProductInput => StorageType::Json,
        }
    }

    /// Whether the widget holds several selections.
    #[must_use]
    pub const fn is_multi(self) -> bool {
        !matches!(self, Self::CommerceCategoryInput)
    }

    /// Endpoints the widget loads its options from.
    #[must_use]
    pub const fn option_endpoints(self) -> &'static [&'static str] {
        match self {
            Self::CommerceCategoryInput | Self::CommerceCategoriesInput => {
                &["/commerce-categories", "/search-categories"]
            }
            Self::CommerceProductInput => &["/search-products"],
            Self::CommerceCategoryProductInput => &[
                "/commerce-categories",
                "/search-categories",
                "/commerce-products",
            ],
        }
    }

    /// Descriptor served to form front-ends.
    #[must_use]
    pub fn descriptor(self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name(),
            storage: self.storage(),
            multiple: self.is_multi(),
            endpoints: self.option_endpoints(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = FieldValueError;

    /// Accepts both the registered snake-case name and the kebab-case
    /// content type used by the edit-view layout.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| FieldValueError::UnknownKind(s.to_string()))
    }
}

/// Public description of a field kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub storage: StorageType,
    pub multiple: bool,
    pub endpoints: &'static [&'static str],
}

/// Selection held by the combined category+product picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProductSelection {
    pub category: Option<CategoryUid>,
    pub products: Vec<Sku>,
}

/// Canonical stored value of a picker field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Category(Option<CategoryUid>),
    Categories(Vec<CategoryUid>),
    Products(Vec<Sku>),
    CategoryProduct(CategoryProductSelection),
}

impl FieldValue {
    /// Normalize a raw stored value into the canonical value for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the raw value cannot be read as the given kind,
    /// or if it is a string that should contain JSON but does not.
    pub fn normalize(kind: FieldKind, raw: &Value) -> Result<Self, FieldValueError> {
        match kind {
            FieldKind::CommerceCategoryInput => match raw {
                Value::Null => Ok(Self::Category(None)),
                Value::String(s) if s.trim().is_empty() => Ok(Self::Category(None)),
                Value::String(s) => Ok(Self::Category(Some(CategoryUid::new(s.trim())))),
                _ => Err(FieldValueError::InvalidShape {
                    kind,
                    expected: "a category UID string",
                }),
            },
            FieldKind::CommerceCategoriesInput => {
                string_list(kind, raw).map(|ids| Self::Categories(collect_ids(ids)))
            }
            FieldKind::CommerceProductInput => {
                string_list(kind, raw).map(|ids| Self::Products(collect_ids(ids)))
            }
            FieldKind::CommerceCategoryProductInput => {
                category_product(kind, raw).map(Self::CategoryProduct)
            }
        }
    }
}

/// Read a list of non-empty strings, accepting a bare scalar or JSON text.
fn string_list(kind: FieldKind, raw: &Value) -> Result<Vec<String>, FieldValueError> {
    const EXPECTED: &str = "an array of strings";

    match raw {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Vec::new());
            }
            if trimmed.starts_with('[') {
                let parsed = parse_json_text(kind, trimmed)?;
                return string_list(kind, &parsed);
            }
            Ok(vec![trimmed.to_string()])
        }
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(Ok(s.trim().to_string())),
                _ => Some(Err(FieldValueError::InvalidShape {
                    kind,
                    expected: EXPECTED,
                })),
            })
            .collect(),
        _ => Err(FieldValueError::InvalidShape {
            kind,
            expected: EXPECTED,
        }),
    }
}

/// Deduplicate while keeping first-seen order.
fn collect_ids<T: From<String> + PartialEq>(values: Vec<String>) -> Vec<T> {
    let mut ids: Vec<T> = Vec::with_capacity(values.len());
    for value in values {
        let id = T::from(value);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

fn category_product(
    kind: FieldKind,
    raw: &Value,
) -> Result<CategoryProductSelection, FieldValueError> {
    const EXPECTED: &str = "an object with `category` and `products`";

    let object = match raw {
        Value::Null => return Ok(CategoryProductSelection::default()),
        Value::String(s) if s.trim().is_empty() => return Ok(CategoryProductSelection::default()),
        Value::String(s) => {
            let parsed = parse_json_text(kind, s.trim())?;
            return category_product(kind, &parsed);
        }
        Value::Object(object) => object,
        _ => {
            return Err(FieldValueError::InvalidShape {
                kind,
                expected: EXPECTED,
            });
        }
    };

    let category = match object.get("category") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(CategoryUid::new(s.trim())),
        Some(_) => {
            return Err(FieldValueError::InvalidShape {
                kind,
                expected: EXPECTED,
            });
        }
    };

    // `products` wins over the legacy single `product` key
    let products = match (object.get("products"), object.get("product")) {
        (Some(products @ Value::Array(_)), _) => string_list(kind, products)?,
        (_, Some(product)) => string_list(kind, product)?,
        (Some(other), None) => string_list(kind, other)?,
        (None, None) => Vec::new(),
    };

    Ok(CategoryProductSelection {
        category,
        products: collect_ids(products),
    })
}

fn parse_json_text(kind: FieldKind, text: &str) -> Result<Value, FieldValueError> {
    serde_json::from_str(text).map_err(|e| FieldValueError::InvalidJson {
        kind,
        reason: e.to_string(),
    })
}
