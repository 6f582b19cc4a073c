//! Integration tests for user registration, tokens, and profiles.
//!
//! These tests require a running API server (`cargo run -p catalog-api`).

use catalog_integration_tests::{TestUser, base_url, unique_email};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let resp = Client::new()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach server");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_create_user_lowercases_email() {
    let email = unique_email("MixedCase");
    let resp = Client::new()
        .post(format!("{}/api/user/create", base_url()))
        .json(&json!({"email": email, "password": "testpass123"}))
        .send()
        .await
        .expect("Failed to register user");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["email"], email.to_lowercase());
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_create_user_empty_email() {
    let resp = Client::new()
        .post(format!("{}/api/user/create", base_url()))
        .json(&json!({"email": "", "password": "testpass123"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_token_is_reused() {
    let user = TestUser::register("token").await;

    let body: Value = Client::new()
        .post(format!("{}/api/user/token", base_url()))
        .json(&json!({"email": user.email, "password": "testpass123"}))
        .send()
        .await
        .expect("Failed to request token")
        .json()
        .await
        .expect("Invalid JSON");

    assert_eq!(body["token"], user.token);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_me_requires_token() {
    let resp = Client::new()
        .get(format!("{}/api/user/me", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let user = TestUser::register("me").await;
    let resp = user.get("/api/user/me").send().await.expect("Failed to get profile");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["email"], user.email);
}
