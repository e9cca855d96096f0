//! Persistence surface for categories and items.
//!
//! Handlers and services depend only on [`ItemRepository`]; the relational
//! and in-memory variants are interchangeable behind `Arc<dyn ItemRepository>`.

mod memory;
mod relational;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use memory::InMemoryItemRepository;
pub use relational::SeaOrmItemRepository;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub image_name: String,
}

/// An item that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category_id: i32,
    pub image_name: String,
}

/// An item joined with its category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub item: Item,
    pub category: String,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A category with this name already exists.
    #[error("category '{0}' already exists")]
    Duplicate(String),

    /// The item references a category that does not exist.
    #[error("category {0} does not exist")]
    ForeignKey(i32),

    #[error("database error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Look up a category by exact name. `Ok(None)` is the normal miss case.
    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError>;

    /// Create a category.
    ///
    /// Fails with [`RepositoryError::Duplicate`] if the name is taken, which
    /// callers racing on the same name should treat as "already created".
    async fn insert_category(&self, name: &str) -> Result<Category, RepositoryError>;

    /// Persist an item. Fails with [`RepositoryError::ForeignKey`] if
    /// `category_id` does not reference an existing category.
    async fn insert_item(&self, item: NewItem) -> Result<Item, RepositoryError>;

    async fn get_item(&self, id: i32) -> Result<Option<ItemDetails>, RepositoryError>;

    /// Whether any persisted item references the image file `image_name`.
    async fn image_in_use(&self, image_name: &str) -> Result<bool, RepositoryError>;
}
