//! Tag route handlers.
//!
//! Both handlers go through [`OwnedCatalog`], so a caller only ever sees and
//! creates their own tags.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{TagInput, TagView};
use crate::services::OwnedCatalog;
use crate::state::AppState;

/// List the caller's tags, name descending.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<TagView>>> {
    let tags = OwnedCatalog::new(state.store(), user.id).list_tags().await?;
    Ok(Json(tags.iter().map(TagView::from).collect()))
}

/// Create a tag owned by the caller.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<TagInput>,
) -> Result<(StatusCode, Json<TagView>)> {
    let tag = OwnedCatalog::new(state.store(), user.id)
        .create_tag(input)
        .await?;
    Ok((StatusCode::CREATED, Json(TagView::from(&tag))))
}
