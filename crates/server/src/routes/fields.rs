//! Custom field registry routes.
//!
//! Form front-ends read the registered picker kinds from here and can ask the
//! service to normalize a stored value before rendering it.

use axum::{Json, extract::Path};
use commerce_fields_core::{FieldDescriptor, FieldKind, FieldValue};
use serde_json::Value;

use crate::error::Result;

/// Descriptors of every registered field kind.
pub async fn index() -> Json<Vec<FieldDescriptor>> {
    Json(FieldKind::ALL.into_iter().map(FieldKind::descriptor).collect())
}

/// Normalize a stored raw value for the field kind `name`.
pub async fn normalize(
    Path(name): Path<String>,
    Json(raw): Json<Value>,
) -> Result<Json<FieldValue>> {
    let kind: FieldKind = name.parse()?;
    Ok(Json(FieldValue::normalize(kind, &raw)?))
}
