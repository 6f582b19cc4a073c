//! User route handlers: registration, token issue, and the caller's profile.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{UserProfile, ValidationError};
use crate::models::validation::required_text;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Credentials exchanged for a token.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Issued token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Register a new user.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let password = request
        .password
        .ok_or(AuthError::Validation(ValidationError::Required {
            field: "password",
        }))?;

    let user = AuthService::new(state.store())
        .create_user(request.email.as_deref(), &password, &request.name)
        .await?;
    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// Exchange email and password for the user's API token.
#[instrument(skip_all)]
pub async fn token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    let email = required_text("email", request.email).map_err(AuthError::from)?;
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or(AuthError::Validation(ValidationError::Required {
            field: "password",
        }))?;

    let token = AuthService::new(state.store())
        .issue_token(&email, &password)
        .await?;
    Ok(Json(TokenResponse { token: token.key }))
}

/// The caller's own profile.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<UserProfile>> {
    let user = AuthService::new(state.store()).get_user(user.id).await?;
    Ok(Json(UserProfile::from(&user)))
}

/// Update the caller's name and/or password.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    let user = AuthService::new(state.store())
        .update_profile(user.id, request.name.as_deref(), request.password.as_deref())
        .await?;
    Ok(Json(UserProfile::from(&user)))
}
