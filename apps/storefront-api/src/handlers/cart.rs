//! # Cart Handlers
//!
//! A caller can only touch their own cart: the body's `username` must match
//! the token subject.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::AppState;
use storefront_core::Cart;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyCartRequest {
    pub username: String,
    pub item_id: i64,
    pub quantity: i64,
}

/// `GET /api/cart`
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.services.carts.get_cart(&caller.username).await?))
}

/// `POST /api/cart/addToCart`
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<ModifyCartRequest>,
) -> Result<Json<Cart>, ApiError> {
    caller.ensure_is(&req.username)?;
    let cart = state
        .services
        .carts
        .add_to_cart(&req.username, req.item_id, req.quantity)
        .await?;
    Ok(Json(cart))
}

/// `POST /api/cart/removeFromCart`
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<ModifyCartRequest>,
) -> Result<Json<Cart>, ApiError> {
    caller.ensure_is(&req.username)?;
    let cart = state
        .services
        .carts
        .remove_from_cart(&req.username, req.item_id, req.quantity)
        .await?;
    Ok(Json(cart))
}
