//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (store reachable)
//!
//! # Users
//! POST  /api/user/create             - Register {email, password, name}
//! POST  /api/user/token              - Exchange {email, password} for {token}
//! GET   /api/user/me                 - Own profile (requires token)
//! PATCH /api/user/me                 - Update own name/password (requires token)
//!
//! # Tags (requires token)
//! GET  /api/product/tags             - List own tags, name descending
//! POST /api/product/tags             - Create tag
//!
//! # Products (requires token)
//! GET    /api/product/products       - List own products (summary)
//! POST   /api/product/products       - Create product (summary)
//! GET    /api/product/products/{id}  - Retrieve product (detail)
//! PUT    /api/product/products/{id}  - Full update (summary)
//! PATCH  /api/product/products/{id}  - Partial update (summary)
//! DELETE /api/product/products/{id}  - Delete product
//! ```

pub mod products;
pub mod tags;
pub mod user;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(user::create))
        .route("/token", post(user::token))
        .route("/me", get(user::me).patch(user::update_me))
}

/// Create the tag and product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/tags", get(tags::index).post(tags::create))
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::replace)
                .patch(products::patch)
                .delete(products::destroy),
        )
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/user", user_routes())
        .nest("/api/product", product_routes())
}

/// Build the full application: health checks, API routes, request IDs, and
/// HTTP tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::db::MemoryStore;

    const TAGS_URL: &str = "/api/product/tags";
    const PRODUCTS_URL: &str = "/api/product/products";

    fn test_app() -> Router {
        app(AppState::new(Arc::new(MemoryStore::new())))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Register a user and return their token.
    async fn login(app: &Router, email: &str) -> String {
        let (status, _) = send(
            app,
            Method::POST,
            "/api/user/create",
            None,
            Some(json!({"email": email, "password": "testpass", "name": "Test"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            Method::POST,
            "/api/user/token",
            None,
            Some(json!({"email": email, "password": "testpass"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_owned()
    }

    fn product_payload(code: &str) -> Value {
        json!({"code": code, "description": "First Product", "picture": "url-picture"})
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, _) = send(&app, Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_required() {
        let app = test_app();
        for uri in [TAGS_URL, PRODUCTS_URL, "/api/user/me"] {
            let (status, body) = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert!(body["error"].is_string());
        }

        let (status, _) = send(&app, Method::GET, TAGS_URL, Some("not-a-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_user_empty_email_is_bad_request() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/user/create",
            None,
            Some(json!({"email": "", "password": "testpass"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("email"));
    }

    #[tokio::test]
    async fn test_create_user_normalizes_email_and_rejects_duplicates() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/user/create",
            None,
            Some(json!({"email": "Test@LULOBANK.com", "password": "testpass"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "test@lulobank.com");
        assert!(body.get("password").is_none());

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/user/create",
            None,
            Some(json!({"email": "test@lulobank.com", "password": "testpass"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_token_bad_credentials() {
        let app = test_app();
        login(&app, "test@lulobank.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/user/token",
            None,
            Some(json!({"email": "test@lulobank.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("token").is_none());

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/user/token",
            None,
            Some(json!({"email": "test@lulobank.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_and_update_profile() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;

        let (status, body) = send(&app, Method::GET, "/api/user/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"email": "test@lulobank.com", "name": "Test"}));

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/user/me",
            Some(&token),
            Some(json!({"name": "New Name", "password": "newpassword"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "New Name");

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/user/me",
            Some(&token),
            Some(json!({"name": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/user/token",
            None,
            Some(json!({"email": "test@lulobank.com", "password": "newpassword"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_retrieve_tags_ordered_and_limited_to_user() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;
        let other = login(&app, "other@lulobank.com").await;

        send(&app, Method::POST, TAGS_URL, Some(&other), Some(json!({"name": "Fruity"}))).await;
        for name in ["Dessert", "Vegan"] {
            let (status, body) =
                send(&app, Method::POST, TAGS_URL, Some(&token), Some(json!({"name": name}))).await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["name"], name);
        }

        let (status, body) = send(&app, Method::GET, TAGS_URL, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Vegan", "Dessert"]);
    }

    #[tokio::test]
    async fn test_create_tag_invalid() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;

        let (status, body) =
            send(&app, Method::POST, TAGS_URL, Some(&token), Some(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name: this field may not be blank");

        let (status, body) = send(&app, Method::GET, TAGS_URL, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;

        let request = Request::builder()
            .method(Method::POST)
            .uri(TAGS_URL)
            .header(header::AUTHORIZATION, format!("Token {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_products_limited_to_user_and_owner_ignored() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;
        let other = login(&app, "other@lulobank.com").await;

        let (_, theirs) =
            send(&app, Method::POST, PRODUCTS_URL, Some(&other), Some(product_payload("9999")))
                .await;

        let mut payload = product_payload("0000");
        payload["user"] = theirs["id"].clone();
        payload["owner"] = json!(999);
        let (status, created) =
            send(&app, Method::POST, PRODUCTS_URL, Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            created.as_object().unwrap().keys().collect::<Vec<_>>(),
            ["code", "description", "id", "picture"]
        );

        let (status, body) = send(&app, Method::GET, PRODUCTS_URL, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([created]));

        let uri = format!("{PRODUCTS_URL}/{}", created["id"]);
        let (status, detail) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, me) = send(&app, Method::GET, "/api/user/me", Some(&token), None).await;
        assert_eq!(me["email"], "test@lulobank.com");
        assert_ne!(detail["owner"], json!(999));

        let (_, other_detail) = send(
            &app,
            Method::GET,
            &format!("{PRODUCTS_URL}/{}", theirs["id"]),
            Some(&other),
            None,
        )
        .await;
        assert_ne!(detail["owner"], other_detail["owner"]);
    }

    #[tokio::test]
    async fn test_retrieve_returns_detail() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;
        let (_, created) =
            send(&app, Method::POST, PRODUCTS_URL, Some(&token), Some(product_payload("0000")))
                .await;

        let uri = format!("{PRODUCTS_URL}/{}", created["id"]);
        let (status, detail) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        for (key, value) in created.as_object().unwrap() {
            assert_eq!(&detail[key], value);
        }
        assert!(detail["owner"].is_number());
        assert!(detail["created_at"].is_string());
        assert!(detail["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_other_users_product_is_not_found() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;
        let other = login(&app, "other@lulobank.com").await;
        let (_, theirs) =
            send(&app, Method::POST, PRODUCTS_URL, Some(&other), Some(product_payload("9999")))
                .await;
        let uri = format!("{PRODUCTS_URL}/{}", theirs["id"]);

        let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"code": "hijack"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::GET, &uri, Some(&other), None).await;
        assert_eq!(body["code"], "9999");
    }

    #[tokio::test]
    async fn test_partial_and_full_update() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;
        let (_, created) =
            send(&app, Method::POST, PRODUCTS_URL, Some(&token), Some(product_payload("0000")))
                .await;
        let uri = format!("{PRODUCTS_URL}/{}", created["id"]);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"description": "Second Product"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "0000");
        assert_eq!(body["description"], "Second Product");
        assert_eq!(body["picture"], "url-picture");

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"code": "0001"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"code": "0001", "description": "Replaced", "picture": "new-url"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"id": created["id"], "code": "0001", "description": "Replaced", "picture": "new-url"})
        );
    }

    #[tokio::test]
    async fn test_patch_with_null_field_is_bad_request() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;
        let (_, created) =
            send(&app, Method::POST, PRODUCTS_URL, Some(&token), Some(product_payload("0000")))
                .await;
        let uri = format!("{PRODUCTS_URL}/{}", created["id"]);

        let (status, body) =
            send(&app, Method::PATCH, &uri, Some(&token), Some(json!({"code": null}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "code: this field may not be null"}));

        let (_, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(body["code"], "0000");
    }

    #[tokio::test]
    async fn test_delete_product() {
        let app = test_app();
        let token = login(&app, "test@lulobank.com").await;
        let (_, created) =
            send(&app, Method::POST, PRODUCTS_URL, Some(&token), Some(product_payload("0000")))
                .await;
        let uri = format!("{PRODUCTS_URL}/{}", created["id"]);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
