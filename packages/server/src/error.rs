use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use serde::Serialize;

use crate::repository::RepositoryError;
use crate::services::item::AddItemError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `CATEGORY_RESOLUTION_FAILED`, `IMAGE_STORAGE_FAILED`,
    /// `ITEM_INSERTION_FAILED`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Name must be 1-255 characters")]
    pub message: String,
}

/// Application-level error type.
///
/// `Validation` and `NotFound` are client errors and echo their message.
/// The remaining variants are server errors: the detail is logged and the
/// client receives a generic message.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    CategoryResolution(String),
    ImageStorage(String),
    ItemInsertion(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::CategoryResolution(detail) => {
                tracing::error!("Category resolution failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "CATEGORY_RESOLUTION_FAILED",
                        message: "Failed to create category".into(),
                    },
                )
            }
            AppError::ImageStorage(detail) => {
                tracing::error!("Image storage failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "IMAGE_STORAGE_FAILED",
                        message: "Failed to store image".into(),
                    },
                )
            }
            AppError::ItemInsertion(detail) => {
                tracing::error!("Item insertion failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "ITEM_INSERTION_FAILED",
                        message: "Failed to insert item".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) => AppError::NotFound(format!("Image '{name}' not found")),
            StorageError::InvalidName(msg) => AppError::Validation(format!("Invalid image name: {msg}")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AddItemError> for AppError {
    fn from(err: AddItemError) -> Self {
        match err {
            AddItemError::CategoryResolution(e) => AppError::CategoryResolution(e.to_string()),
            AddItemError::ImageStorage(e) => AppError::ImageStorage(e.to_string()),
            AddItemError::ItemInsertion(e) => AppError::ItemInsertion(e.to_string()),
        }
    }
}
