//! Axum router configuration
//!
//! ## Router Structure
//!
//! ```text
//! /
//! ├── POST /api/user/create            public
//! ├── POST /login                      public
//! └── bearer token required
//!     ├── GET  /api/user/id/{id}
//!     ├── GET  /api/user/{username}
//!     ├── GET  /api/cart
//!     ├── POST /api/cart/addToCart
//!     ├── POST /api/cart/removeFromCart
//!     ├── POST /api/order/submit/{username}
//!     ├── GET  /api/order/history/{username}
//!     ├── GET  /api/item
//!     ├── GET  /api/item/{id}
//!     └── GET  /api/item/name/{name}
//! ```

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::auth::require_bearer;
use crate::handlers::{cart, item, order, user};
use crate::AppState;

/// Build the complete router.
pub fn build_router(state: AppState) -> Router {
    public_router()
        .merge(protected_router(state.clone()))
        .with_state(state)
}

fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/user/create", post(user::create_user))
        .route("/login", post(user::login))
}

/// `route_layer` so unknown paths still answer 404 rather than 401.
fn protected_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/user/id/{id}", get(user::find_by_id))
        .route("/api/user/{username}", get(user::find_by_username))
        .route("/api/cart", get(cart::get_cart))
        .route("/api/cart/addToCart", post(cart::add_to_cart))
        .route("/api/cart/removeFromCart", post(cart::remove_from_cart))
        .route("/api/order/submit/{username}", post(order::submit))
        .route("/api/order/history/{username}", get(order::history))
        .route("/api/item", get(item::list_items))
        .route("/api/item/{id}", get(item::get_item))
        .route("/api/item/name/{name}", get(item::find_items_by_name))
        .route_layer(from_fn_with_state(state, require_bearer))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, HeaderMap, Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use storefront_db::seed::seed_default_catalog;
    use storefront_db::{Database, DbConfig};
    use storefront_service::{PasswordEncoder, ServiceResult, Services, TokenService};

    struct PlainEncoder;

    impl PasswordEncoder for PlainEncoder {
        fn encode(&self, raw: &str) -> ServiceResult<String> {
            Ok(format!("plain:{raw}"))
        }

        fn matches(&self, raw: &str, encoded: &str) -> bool {
            encoded.strip_prefix("plain:") == Some(raw)
        }
    }

    struct TestApp {
        router: Router,
        tokens: TokenService,
    }

    impl TestApp {
        async fn new() -> Self {
            let db = Database::new(DbConfig::in_memory()).await.unwrap();
            seed_default_catalog(&db.items()).await.unwrap();

            let tokens = TokenService::new("router-test-secret", Duration::seconds(3600));
            let services = Services::new(&db, tokens.clone(), Arc::new(PlainEncoder));

            TestApp {
                router: build_router(AppState::new(services)),
                tokens,
            }
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            auth: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, HeaderMap, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(auth) = auth {
                builder = builder.header(header::AUTHORIZATION, auth);
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, headers, value)
        }

        /// Signs up and returns the `Authorization` header value.
        async fn signup(&self, username: &str) -> String {
            let (status, headers, _) = self
                .send(
                    "POST",
                    "/api/user/create",
                    None,
                    Some(json!({
                        "username": username,
                        "password": "somepassword",
                        "confirmPassword": "somepassword"
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            headers[header::AUTHORIZATION].to_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn test_signup_returns_user_and_token() {
        let app = TestApp::new().await;

        let (status, headers, body) = app
            .send(
                "POST",
                "/api/user/create",
                None,
                Some(json!({
                    "username": "alice",
                    "password": "somepassword",
                    "confirmPassword": "somepassword"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
        assert!(body.get("passwordHash").is_none());
        let auth = headers[header::AUTHORIZATION].to_str().unwrap();
        assert!(auth.starts_with("Bearer "));

        let (status, _, body) = app.send("GET", "/api/user/alice", Some(auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cartId"], body["id"]);
    }

    #[tokio::test]
    async fn test_signup_rejections() {
        let app = TestApp::new().await;
        app.signup("alice").await;

        let (status, _, body) = app
            .send(
                "POST",
                "/api/user/create",
                None,
                Some(json!({
                    "username": "alice",
                    "password": "somepassword",
                    "confirmPassword": "somepassword"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let (status, _, body) = app
            .send(
                "POST",
                "/api/user/create",
                None,
                Some(json!({
                    "username": "bob",
                    "password": "somepassword",
                    "confirmPassword": "different"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_login() {
        let app = TestApp::new().await;
        app.signup("alice").await;

        let (status, _, body) = app
            .send(
                "POST",
                "/login",
                None,
                Some(json!({ "username": "alice", "password": "somepassword" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(body["expiresIn"], 3600);
        let token = body["token"].as_str().unwrap();
        assert_eq!(app.tokens.validate(token).unwrap(), "alice");

        let (status, _, body) = app
            .send(
                "POST",
                "/login",
                None,
                Some(json!({ "username": "alice", "password": "wrongpassword" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_protected_routes_require_valid_token() {
        let app = TestApp::new().await;
        app.signup("alice").await;

        let (status, _, _) = app.send("GET", "/api/cart", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _, _) = app.send("GET", "/api/cart", Some("Bearer junk"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let forged = TokenService::new("other-secret", Duration::seconds(3600))
            .issue("alice")
            .unwrap();
        let (status, _, _) = app
            .send("GET", "/api/cart", Some(&forged.header_value()), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let expired = app
            .tokens
            .issue_at("alice", Utc::now() - Duration::seconds(7200))
            .unwrap();
        let (status, _, body) = app
            .send("GET", "/api/cart", Some(&expired.header_value()), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "token has expired");

        let (status, _, _) = app.send("GET", "/api/nothing-here", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let app = TestApp::new().await;
        let auth = app.signup("alice").await;

        let (status, _, cart) = app
            .send(
                "POST",
                "/api/cart/addToCart",
                Some(&auth),
                Some(json!({ "username": "alice", "itemId": 1, "quantity": 2 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cart["totalCents"], 598);
        assert_eq!(cart["items"].as_array().unwrap().len(), 2);

        let (status, _, cart) = app
            .send(
                "POST",
                "/api/cart/removeFromCart",
                Some(&auth),
                Some(json!({ "username": "alice", "itemId": 1, "quantity": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cart["totalCents"], 299);

        let (status, _, current) = app.send("GET", "/api/cart", Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(current, cart);

        let (status, _, body) = app
            .send(
                "POST",
                "/api/cart/addToCart",
                Some(&auth),
                Some(json!({ "username": "alice", "itemId": 1, "quantity": 0 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _, _) = app
            .send(
                "POST",
                "/api/cart/addToCart",
                Some(&auth),
                Some(json!({ "username": "alice", "itemId": 999, "quantity": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cannot_touch_other_users_cart() {
        let app = TestApp::new().await;
        let alice = app.signup("alice").await;
        app.signup("mallory").await;

        let (status, _, body) = app
            .send(
                "POST",
                "/api/cart/addToCart",
                Some(&alice),
                Some(json!({ "username": "mallory", "itemId": 1, "quantity": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");

        let (status, _, _) = app
            .send("POST", "/api/order/submit/mallory", Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_user_with_valid_token() {
        let app = TestApp::new().await;
        let bob = app.tokens.issue("bob").unwrap().header_value();

        let (status, _, body) = app
            .send(
                "POST",
                "/api/cart/addToCart",
                Some(&bob),
                Some(json!({ "username": "bob", "itemId": 999, "quantity": 1 })),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found: bob");
    }

    #[tokio::test]
    async fn test_submit_and_history() {
        let app = TestApp::new().await;
        let auth = app.signup("carol").await;
        for item_id in [1, 2] {
            app.send(
                "POST",
                "/api/cart/addToCart",
                Some(&auth),
                Some(json!({ "username": "carol", "itemId": item_id, "quantity": 1 })),
            )
            .await;
        }

        let (status, _, order) = app
            .send("POST", "/api/order/submit/carol", Some(&auth), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["username"], "carol");
        assert_eq!(order["items"].as_array().unwrap().len(), 2);
        assert_eq!(order["totalCents"], 498);

        let (status, _, history) = app
            .send("GET", "/api/order/history/carol", Some(&auth), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history, json!([order]));
    }

    #[tokio::test]
    async fn test_item_routes() {
        let app = TestApp::new().await;
        let auth = app.signup("alice").await;

        let (status, _, items) = app.send("GET", "/api/item", Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(items.as_array().unwrap().len(), 2);

        let (status, _, item) = app.send("GET", "/api/item/2", Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["name"], "Square Widget");
        assert_eq!(item["priceCents"], 199);

        let (status, _, found) = app
            .send("GET", "/api/item/name/Round%20Widget", Some(&auth), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found[0]["id"], 1);

        let (status, _, _) = app.send("GET", "/api/item/500", Some(&auth), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = app
            .send("GET", "/api/item/name/Nothing", Some(&auth), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
