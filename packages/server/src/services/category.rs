use tracing::info;

use crate::repository::{Category, ItemRepository, RepositoryError};

/// Return the category named `name`, creating it on first use.
///
/// A [`RepositoryError::Duplicate`] from the insert means a concurrent
/// request created the same category between our lookup and insert; the row
/// is re-fetched instead of failing.
pub async fn resolve_category(
    repo: &dyn ItemRepository,
    name: &str,
) -> Result<Category, RepositoryError> {
    if let Some(existing) = repo.get_category_by_name(name).await? {
        return Ok(existing);
    }

    match repo.insert_category(name).await {
        Ok(created) => {
            info!(category_id = created.id, category = %created.name, "Created category");
            Ok(created)
        }
        Err(RepositoryError::Duplicate(_)) => repo
            .get_category_by_name(name)
            .await?
            .ok_or_else(|| {
                RepositoryError::Backend(format!(
                    "category '{name}' reported as duplicate but not found"
                ))
            }),
        Err(e) => Err(e),
    }
}
