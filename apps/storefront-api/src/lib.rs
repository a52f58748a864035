//! # Storefront API
//!
//! HTTP server exposing users, carts, orders and the catalog.
//!
//! ## Configuration
//! Environment variables (see [`config::AppConfig`]):
//! - `HTTP_PORT` - listen port (default: 8080)
//! - `DATABASE_PATH` - SQLite file (default: storefront.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - secret for token signing
//! - `TOKEN_VALIDITY_SECS` - token lifetime (default: 500000)
//! - `CLEAR_CART_ON_SUBMIT` - empty the cart after submit (default: false)
//! - `SEED_CATALOG` - seed an empty catalog at startup (default: true)

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use chrono::Duration;

use storefront_db::Database;
use storefront_service::{Argon2PasswordEncoder, Services, TokenService};

pub use config::AppConfig;
pub use error::ApiError;
pub use router::build_router;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        AppState { services }
    }

    /// Production wiring: Argon2 passwords, configured secret and validity.
    pub fn from_config(db: &Database, config: &AppConfig) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            Duration::seconds(config.token_validity_secs),
        );
        let services = Services::new(db, tokens, Arc::new(Argon2PasswordEncoder::new()))
            .clear_cart_on_submit(config.clear_cart_on_submit);

        AppState::new(services)
    }
}
