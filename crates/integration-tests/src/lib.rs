//! Integration tests for the Catalog API.
//!
//! These tests talk HTTP to a running server and are ignored by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a server (the memory store needs no database)
//! CATALOG_STORE=memory cargo run -p catalog-api
//!
//! # Run integration tests
//! cargo test -p catalog-integration-tests -- --ignored
//! ```
//!
//! `CATALOG_BASE_URL` overrides the default `http://localhost:8000`.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// A unique email so repeated runs never collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// A registered user with an API token.
pub struct TestUser {
    pub email: String,
    pub token: String,
    client: Client,
    base_url: String,
}

impl TestUser {
    /// Register a fresh user and fetch their token.
    ///
    /// # Panics
    ///
    /// Panics if the server is unreachable or rejects the registration.
    pub async fn register(prefix: &str) -> Self {
        let client = Client::new();
        let base_url = base_url();
        let email = unique_email(prefix);
        let password = "testpass123";

        let resp = client
            .post(format!("{base_url}/api/user/create"))
            .json(&json!({"email": email, "password": password, "name": "Integration"}))
            .send()
            .await
            .expect("Failed to register user");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let token = client
            .post(format!("{base_url}/api/user/token"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .expect("Failed to request token")
            .json::<TokenResponse>()
            .await
            .expect("Failed to parse token response")
            .token;

        Self {
            email,
            token,
            client,
            base_url,
        }
    }

    /// `GET` an API path with this user's token.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.get(self.url(path)))
    }

    /// `POST` an API path with this user's token.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.post(self.url(path)))
    }

    /// `PUT` an API path with this user's token.
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.put(self.url(path)))
    }

    /// `PATCH` an API path with this user's token.
    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.patch(self.url(path)))
    }

    /// `DELETE` an API path with this user's token.
    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.delete(self.url(path)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", format!("Token {}", self.token))
    }
}
