use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{Category, Item, ItemDetails, ItemRepository, NewItem, RepositoryError};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    items: Vec<Item>,
}

/// [`ItemRepository`] that keeps rows in memory.
///
/// Mirrors the relational contract (unique category names, foreign key on
/// `category_id`, sequential IDs starting at 1) and can be switched into a
/// failing mode for item inserts.
#[derive(Default)]
pub struct InMemoryItemRepository {
    tables: Mutex<Tables>,
    fail_item_inserts: AtomicBool,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `insert_item` fail with a backend error.
    pub fn fail_item_inserts(&self, fail: bool) {
        self.fail_item_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn insert_category(&self, name: &str) -> Result<Category, RepositoryError> {
        let mut tables = self.lock();
        if tables.categories.iter().any(|c| c.name == name) {
            return Err(RepositoryError::Duplicate(name.to_string()));
        }

        let category = Category {
            id: tables.categories.len() as i32 + 1,
            name: name.to_string(),
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn insert_item(&self, new_item: NewItem) -> Result<Item, RepositoryError> {
        if self.fail_item_inserts.load(Ordering::SeqCst) {
            return Err(RepositoryError::Backend("injected insert failure".into()));
        }

        let mut tables = self.lock();
        if !tables.categories.iter().any(|c| c.id == new_item.category_id) {
            return Err(RepositoryError::ForeignKey(new_item.category_id));
        }

        let item = Item {
            id: tables.items.len() as i32 + 1,
            name: new_item.name,
            category_id: new_item.category_id,
            image_name: new_item.image_name,
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: i32) -> Result<Option<ItemDetails>, RepositoryError> {
        let tables = self.lock();
        let Some(item) = tables.items.iter().find(|i| i.id == id) else {
            return Ok(None);
        };
        let category = tables
            .categories
            .iter()
            .find(|c| c.id == item.category_id)
            .map(|c| c.name.clone())
            .ok_or_else(|| {
                RepositoryError::Backend(format!(
                    "item {id} references missing category {}",
                    item.category_id
                ))
            })?;

        Ok(Some(ItemDetails {
            item: item.clone(),
            category,
        }))
    }

    async fn image_in_use(&self, image_name: &str) -> Result<bool, RepositoryError> {
        Ok(self.lock().items.iter().any(|i| i.image_name == image_name))
    }
}
