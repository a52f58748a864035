//! # Item Handlers

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::AppState;
use storefront_core::Item;

/// `GET /api/item`
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.services.items.list_items().await?))
}

/// `GET /api/item/{id}`
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.services.items.get_item(id).await?))
}

/// `GET /api/item/name/{name}`
pub async fn find_items_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.services.items.find_items_by_name(&name).await?))
}
