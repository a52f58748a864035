//! # User Handlers
//!
//! Sign up and login are public; both answer with a fresh bearer token in
//! the `Authorization` header.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use storefront_core::User;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// `POST /api/user/create`
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .services
        .users
        .create_user(&req.username, &req.password, &req.confirm_password)
        .await?;
    let token = state.services.tokens.issue(&user.username)?;

    Ok(([(header::AUTHORIZATION, token.header_value())], Json(user)).into_response())
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .services
        .users
        .authenticate(&req.username, &req.password)
        .await?;
    let token = state.services.tokens.issue(&user.username)?;

    let body = LoginResponse {
        token: token.token.clone(),
        token_type: "Bearer",
        expires_in: token.expires_in_secs,
    };
    Ok(([(header::AUTHORIZATION, token.header_value())], Json(body)).into_response())
}

/// `GET /api/user/id/{id}`
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    debug!(id, "find_by_id");
    Ok(Json(state.services.users.find_by_id(id).await?))
}

/// `GET /api/user/{username}`
pub async fn find_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.users.find_by_username(&username).await?))
}
