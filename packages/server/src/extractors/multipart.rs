use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};

use crate::error::AppError;
use crate::models::item::ItemForm;

/// Collects the `name`, `category` and `image` parts of an add-item
/// submission into an [`ItemForm`].
///
/// Only transport-level problems are rejected here (bad multipart body,
/// repeated fields). Content checks happen in [`ItemForm::validate`].
pub struct ItemMultipart(pub ItemForm);

impl<S> FromRequest<S> for ItemMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut form = ItemForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            match field.name() {
                Some("name") => set_once(&mut form.name, "name", read_text(field).await?)?,
                Some("category") => {
                    set_once(&mut form.category, "category", read_text(field).await?)?
                }
                Some("image") => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
                    set_once(&mut form.image, "image", data)?;
                }
                _ => {} // Ignore unknown fields.
            }
        }

        Ok(ItemMultipart(form))
    }
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))
}

fn set_once<T>(slot: &mut Option<T>, field: &str, value: T) -> Result<(), AppError> {
    if slot.is_some() {
        return Err(AppError::Validation(format!(
            "Field '{field}' was supplied more than once"
        )));
    }
    *slot = Some(value);
    Ok(())
}
