//! Product route handlers.
//!
//! Listing, creating, and updating respond with the summary shape; retrieving
//! a single product responds with the detail shape.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use catalog_core::ProductId;

use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, ProductInput, ProductView, Representation};
use crate::services::{OwnedCatalog, ProductUpdate};
use crate::state::AppState;

/// List the caller's products in insertion order.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ProductView>>> {
    let products = OwnedCatalog::new(state.store(), user.id)
        .list_products()
        .await?;
    Ok(Json(
        products
            .iter()
            .map(|p| p.represent(Representation::Summary))
            .collect(),
    ))
}

/// Create a product owned by the caller.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<ProductView>)> {
    let product = OwnedCatalog::new(state.store(), user.id)
        .create_product(input)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(product.represent(Representation::Summary)),
    ))
}

/// Retrieve one of the caller's products in detail.
#[instrument(skip_all, fields(user_id = %user.id, product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = OwnedCatalog::new(state.store(), user.id)
        .retrieve_product(id)
        .await?;
    Ok(Json(product.represent(Representation::Detail)))
}

/// Replace every editable field of one of the caller's products.
#[instrument(skip_all, fields(user_id = %user.id, product_id = %id))]
pub async fn replace(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<ProductView>> {
    update(&state, &user, id, input, ProductUpdate::Full).await
}

/// Change only the supplied fields of one of the caller's products.
#[instrument(skip_all, fields(user_id = %user.id, product_id = %id))]
pub async fn patch(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<ProductView>> {
    update(&state, &user, id, input, ProductUpdate::Partial).await
}

/// Delete one of the caller's products.
#[instrument(skip_all, fields(user_id = %user.id, product_id = %id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    OwnedCatalog::new(state.store(), user.id)
        .destroy_product(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update(
    state: &AppState,
    user: &CurrentUser,
    id: ProductId,
    input: ProductInput,
    mode: ProductUpdate,
) -> Result<Json<ProductView>> {
    let product = OwnedCatalog::new(state.store(), user.id)
        .update_product(id, input, mode)
        .await?;
    Ok(Json(product.represent(Representation::Summary)))
}
