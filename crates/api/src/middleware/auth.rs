//! Token authentication extractor.
//!
//! Clients authenticate with `Authorization: Token <key>`; the `Bearer`
//! scheme is accepted as well. Missing, malformed, or unknown tokens are
//! rejected with `401 {"error": ...}` before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Extractor that requires a valid API token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication credentials were not provided".to_string())
            })?;

        let key = parse_token(header)
            .ok_or_else(|| AppError::Unauthorized("Invalid token header".to_string()))?;

        let user = AuthService::new(state.store())
            .authenticate_token(key)
            .await
            .map_err(|e| match e {
                AuthError::InvalidToken => AppError::Unauthorized("Invalid token".to_string()),
                other => AppError::Auth(other),
            })?;

        let current = CurrentUser::from(&user);
        tracing::Span::current().record("user_id", tracing::field::display(current.id));
        set_sentry_user(&current.id, Some(current.email.as_str()));

        Ok(Self(current))
    }
}

/// Extract the key from a `Token <key>` or `Bearer <key>` header value.
fn parse_token(header: &str) -> Option<&str> {
    let (scheme, key) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_schemes() {
        assert_eq!(parse_token("Token abc123"), Some("abc123"));
        assert_eq!(parse_token("token abc123"), Some("abc123"));
        assert_eq!(parse_token("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn test_parse_token_rejects_malformed() {
        assert_eq!(parse_token("abc123"), None);
        assert_eq!(parse_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_token("Token "), None);
        assert_eq!(parse_token("Token abc 123"), None);
    }
}
