//! # Order Handlers

use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::AppState;
use storefront_core::Order;

/// `POST /api/order/submit/{username}`
pub async fn submit(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
) -> Result<Json<Order>, ApiError> {
    caller.ensure_is(&username)?;
    Ok(Json(state.services.orders.submit(&username).await?))
}

/// `GET /api/order/history/{username}`
pub async fn history(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Order>>, ApiError> {
    caller.ensure_is(&username)?;
    Ok(Json(state.services.orders.get_orders_for_user(&username).await?))
}
