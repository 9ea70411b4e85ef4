//! Product picker route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use commerce_fields_core::{CategoryUid, ProductOption};
use serde::Deserialize;

use super::SearchQuery;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the category product listing.
#[derive(Debug, Deserialize)]
pub struct CategoryProductsQuery {
    #[serde(rename = "categoryUid")]
    pub category_uid: Option<String>,
}

/// Products assigned to the category in `categoryUid`.
pub async fn by_category(
    State(state): State<AppState>,
    Query(params): Query<CategoryProductsQuery>,
) -> Result<Json<Vec<ProductOption>>> {
    let uid = params
        .category_uid
        .as_deref()
        .map(str::trim)
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| AppError::BadRequest("Category UID is required".to_string()))?;

    let products = state
        .catalog()
        .products_by_category(&CategoryUid::new(uid))
        .await?;
    Ok(Json(products))
}

/// Products whose name matches `query`.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<ProductOption>>> {
    let products = state
        .catalog()
        .search_products(params.query.as_deref())
        .await?;
    Ok(Json(products))
}
