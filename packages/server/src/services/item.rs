use common::ImageFormat;
use common::storage::{ImageName, ImageStore, StorageError};
use thiserror::Error;
use tracing::{info, warn};

use super::category::resolve_category;
use crate::models::item::AddItemRequest;
use crate::repository::{ItemDetails, ItemRepository, NewItem, RepositoryError};

/// Failures past validation. All of them are server-side.
#[derive(Debug, Error)]
pub enum AddItemError {
    #[error("category resolution failed: {0}")]
    CategoryResolution(#[source] RepositoryError),

    #[error("image storage failed: {0}")]
    ImageStorage(#[source] StorageError),

    #[error("item insertion failed: {0}")]
    ItemInsertion(#[source] RepositoryError),
}

/// Persist a validated submission.
///
/// Resolves the category, stores the image, then inserts the item. The item
/// insert only runs once both earlier steps have succeeded. If the insert
/// fails, an image file written by this call is removed again unless an item
/// committed in the meantime references it. A category created along the way
/// is kept either way.
pub async fn add_item(
    repo: &dyn ItemRepository,
    images: &dyn ImageStore,
    request: AddItemRequest,
) -> Result<ItemDetails, AddItemError> {
    let category = resolve_category(repo, &request.category)
        .await
        .map_err(AddItemError::CategoryResolution)?;

    let stored = images
        .put(&request.image, request.format)
        .await
        .map_err(AddItemError::ImageStorage)?;

    let new_item = NewItem {
        name: request.name,
        category_id: category.id,
        image_name: stored.name.file_name(),
    };

    match repo.insert_item(new_item).await {
        Ok(item) => {
            if !stored.created {
                // Another request wrote the file; its failed insert may have
                // removed it before this item was committed.
                restore_image(images, &stored.name, &request.image, request.format).await;
            }
            info!(
                item_id = item.id,
                category_id = category.id,
                image = %item.image_name,
                "Item created"
            );
            Ok(ItemDetails {
                item,
                category: category.name,
            })
        }
        Err(e) => {
            if stored.created {
                discard_image(repo, images, &stored.name).await;
            }
            Err(AddItemError::ItemInsertion(e))
        }
    }
}

async fn discard_image(repo: &dyn ItemRepository, images: &dyn ImageStore, name: &ImageName) {
    match repo.image_in_use(&name.file_name()).await {
        Ok(false) => {}
        Ok(true) => {
            info!(image = %name, "Keeping image referenced by another item");
            return;
        }
        Err(e) => {
            warn!(image = %name, error = %e, "Could not check image references, keeping it");
            return;
        }
    }

    match images.delete(name).await {
        Ok(_) => info!(image = %name, "Removed image of failed item insert"),
        Err(e) => warn!(image = %name, error = %e, "Failed to remove orphaned image"),
    }
}

async fn restore_image(
    images: &dyn ImageStore,
    name: &ImageName,
    data: &[u8],
    format: ImageFormat,
) {
    match images.exists(name).await {
        Ok(true) => {}
        Ok(false) => match images.put(data, format).await {
            Ok(_) => warn!(image = %name, "Restored image removed by a concurrent cleanup"),
            Err(e) => warn!(image = %name, error = %e, "Failed to restore image"),
        },
        Err(e) => warn!(image = %name, error = %e, "Failed to check image"),
    }
}
