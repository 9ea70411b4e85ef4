//! Category picker route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use commerce_fields_core::CategoryOption;

use super::SearchQuery;
use crate::error::Result;
use crate::state::AppState;

/// Every visible category as an indented option list.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CategoryOption>>> {
    Ok(Json(state.catalog().categories().await?))
}

/// Categories whose name contains `query`.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<CategoryOption>>> {
    let categories = state
        .catalog()
        .search_categories(params.query.as_deref())
        .await?;
    Ok(Json(categories))
}
