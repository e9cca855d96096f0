use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};

use super::{Category, Item, ItemDetails, ItemRepository, NewItem, RepositoryError};
use crate::entity::{category, item};

/// [`ItemRepository`] backed by a sea-orm connection (SQLite or PostgreSQL).
#[derive(Clone)]
pub struct SeaOrmItemRepository {
    db: DatabaseConnection,
}

impl SeaOrmItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn backend(err: DbErr) -> RepositoryError {
    RepositoryError::Backend(err.to_string())
}

impl From<category::Model> for Category {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<item::Model> for Item {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category_id: model.category_id,
            image_name: model.image_name,
        }
    }
}

#[async_trait]
impl ItemRepository for SeaOrmItemRepository {
    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let found = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(found.map(Category::from))
    }

    async fn insert_category(&self, name: &str) -> Result<Category, RepositoryError> {
        let model = category::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let result = category::Entity::insert(model)
            .on_conflict(
                OnConflict::column(category::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            Ok(res) => Ok(Category {
                id: res.last_insert_id,
                name: name.to_string(),
            }),
            Err(DbErr::RecordNotInserted) => Err(RepositoryError::Duplicate(name.to_string())),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(RepositoryError::Duplicate(name.to_string()))
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn insert_item(&self, new_item: NewItem) -> Result<Item, RepositoryError> {
        let category_id = new_item.category_id;
        let txn = self.db.begin().await.map_err(backend)?;

        // The schema FK enforces this too; checking here gives a typed error
        // regardless of whether the backend has FK enforcement switched on.
        if category::Entity::find_by_id(category_id)
            .one(&txn)
            .await
            .map_err(backend)?
            .is_none()
        {
            return Err(RepositoryError::ForeignKey(category_id));
        }

        let model = item::ActiveModel {
            name: Set(new_item.name),
            category_id: Set(category_id),
            image_name: Set(new_item.image_name),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                RepositoryError::ForeignKey(category_id)
            }
            _ => backend(e),
        })?;

        txn.commit().await.map_err(backend)?;

        Ok(Item::from(model))
    }

    async fn get_item(&self, id: i32) -> Result<Option<ItemDetails>, RepositoryError> {
        let Some(model) = item::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };

        let category = category::Entity::find_by_id(model.category_id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| {
                RepositoryError::Backend(format!(
                    "item {id} references missing category {}",
                    model.category_id
                ))
            })?;

        Ok(Some(ItemDetails {
            item: Item::from(model),
            category: category.name,
        }))
    }

    async fn image_in_use(&self, image_name: &str) -> Result<bool, RepositoryError> {
        let count = item::Entity::find()
            .filter(item::Column::ImageName.eq(image_name))
            .count(&self.db)
            .await
            .map_err(backend)?;
        Ok(count > 0)
    }
}
