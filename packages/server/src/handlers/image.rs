use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::storage::ImageName;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::path::AppPath;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{name}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Download an item image",
    description = "Streams a stored image. Names are content-addressed, so responses carry \
        the digest as ETag and honour If-None-Match.",
    params(("name" = String, Path, description = "Image file name, e.g. `<sha256>.jpg`")),
    responses(
        (status = 200, description = "Image content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 400, description = "Malformed image name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers))]
pub async fn get_image(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let name = ImageName::parse(&name)?;

    let etag_value = format!("\"{}\"", name.digest_hex());
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let reader = state.images.get_stream(&name).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(name.file_name())
        .first_raw()
        .unwrap_or(name.format().mime_type());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}
