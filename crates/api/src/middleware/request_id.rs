//! Correlation IDs for API requests.
//!
//! A client or gateway may send its own `x-request-id`; the API keeps it so
//! the same ID shows up in the caller's logs and ours. Requests without a
//! usable ID get a fresh UUID v4. The chosen ID goes on the request span,
//! the Sentry scope, and the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID that is accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Caller-supplied ID, if it is short, non-empty, visible ASCII.
fn supplied_request_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let usable = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| value.to_owned())
}

/// Tag every request with a correlation ID and echo it in the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        supplied_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
