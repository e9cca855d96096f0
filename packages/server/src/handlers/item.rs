use axum::Json;
use axum::extract::{DefaultBodyLimit, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::multipart::ItemMultipart;
use crate::extractors::path::AppPath;
use crate::models::item::{AddItemResponse, ItemResponse};
use crate::services;
use crate::state::AppState;

/// Headroom over the image limit for the text fields and multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn add_item_body_limit(max_image_size: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_image_size.saturating_add(MULTIPART_OVERHEAD))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Items",
    operation_id = "addItem",
    summary = "Add an item",
    description = "Creates an item from a multipart submission with `name`, `category` and \
        `image` (JPEG or PNG) parts. The category is created on first use. Images are stored \
        under a content-derived name, so identical uploads share one file.",
    request_body(content_type = "multipart/form-data", description = "Item name, category and image"),
    responses(
        (status = 200, description = "Item received", body = AddItemResponse),
        (status = 400, description = "Malformed submission (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (CATEGORY_RESOLUTION_FAILED, IMAGE_STORAGE_FAILED, ITEM_INSERTION_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, form))]
pub async fn add_item(
    State(state): State<AppState>,
    ItemMultipart(form): ItemMultipart,
) -> Result<Json<AddItemResponse>, AppError> {
    let request = form.validate(state.config.storage.max_image_size)?;

    let details =
        services::item::add_item(&*state.repository, &*state.images, request).await?;

    Ok(Json(AddItemResponse::from(details)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Items",
    operation_id = "getItem",
    summary = "Get an item by ID",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item", body = ItemResponse),
        (status = 400, description = "Malformed item ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ItemResponse>, AppError> {
    let details = state
        .repository
        .get_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))?;

    Ok(Json(ItemResponse::from(details)))
}
