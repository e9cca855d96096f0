use bytes::Bytes;
use common::ImageFormat;
use serde::Serialize;

use crate::error::AppError;
use crate::repository::ItemDetails;

/// Upper bound for `name` and `category`, in characters.
pub const MAX_FIELD_CHARS: usize = 255;

/// Raw fields of an add-item multipart submission, before validation.
#[derive(Debug, Default, Clone)]
pub struct ItemForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub image: Option<Bytes>,
}

/// A validated add-item submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemRequest {
    pub name: String,
    pub category: String,
    pub image: Bytes,
    pub format: ImageFormat,
}

impl ItemForm {
    /// Validate the raw form into an [`AddItemRequest`].
    ///
    /// Pure: never touches disk or the database. Text fields are trimmed.
    pub fn validate(self, max_image_size: usize) -> Result<AddItemRequest, AppError> {
        let name = validate_text_field(self.name, "Name")?;
        let category = validate_text_field(self.category, "Category")?;

        let image = self
            .image
            .ok_or_else(|| AppError::Validation("Missing 'image' field".into()))?;
        if image.is_empty() {
            return Err(AppError::Validation("Image must not be empty".into()));
        }
        if image.len() > max_image_size {
            return Err(AppError::Validation(format!(
                "Image exceeds maximum size of {max_image_size} bytes"
            )));
        }
        let format = ImageFormat::detect(&image).ok_or_else(|| {
            AppError::Validation("Image must be a JPEG or PNG file".into())
        })?;

        Ok(AddItemRequest {
            name,
            category,
            image,
            format,
        })
    }
}

fn validate_text_field(value: Option<String>, label: &str) -> Result<String, AppError> {
    let value = value.ok_or_else(|| AppError::Validation(format!("{label} is required")))?;
    let value = value.trim();
    if value.is_empty() || value.chars().count() > MAX_FIELD_CHARS {
        return Err(AppError::Validation(format!(
            "{label} must be 1-{MAX_FIELD_CHARS} characters"
        )));
    }
    Ok(value.to_string())
}

/// Response DTO for a stored item.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ItemResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "jacket")]
    pub name: String,
    /// Category name.
    #[schema(example = "fashion")]
    pub category: String,
    /// Content-addressed image file name, served under `/api/v1/images/`.
    #[schema(example = "a1b2c3d4e5f6....jpg")]
    pub image_name: String,
}

impl From<ItemDetails> for ItemResponse {
    fn from(details: ItemDetails) -> Self {
        Self {
            id: details.item.id,
            name: details.item.name,
            category: details.category,
            image_name: details.item.image_name,
        }
    }
}

/// Acknowledgement returned after an item is created.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AddItemResponse {
    #[schema(example = "item received: jacket")]
    pub message: String,
    pub item: ItemResponse,
}

impl From<ItemDetails> for AddItemResponse {
    fn from(details: ItemDetails) -> Self {
        Self {
            message: format!("item received: {}", details.item.name),
            item: ItemResponse::from(details),
        }
    }
}
