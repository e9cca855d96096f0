use catalog_server::entity::{category, item};
use catalog_server::repository::ItemRepository;
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::common::{TestApp, jpeg_bytes, routes};

#[tokio::test]
async fn add_item_persists_rows_linked_by_category_id() {
    let (app, db) = TestApp::spawn_sqlite().await;

    let res = app
        .add_item(Some("jacket"), Some("fashion"), Some(jpeg_bytes(1)))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["message"], "item received: jacket");

    let categories = category::Entity::find().all(&db).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "fashion");

    let items = item::Entity::find().all(&db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "jacket");
    assert_eq!(items[0].category_id, categories[0].id);
    assert_eq!(app.stored_images(), vec![items[0].image_name.clone()]);
}

#[tokio::test]
async fn add_item_reuses_existing_category_row() {
    let (app, db) = TestApp::spawn_sqlite().await;
    let phone = app.repo.insert_category("phone").await.unwrap();
    assert_eq!(phone.id, 1);

    let res = app
        .add_item(Some("MacBook"), Some("phone"), Some(jpeg_bytes(2)))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    assert_eq!(category::Entity::find().count(&db).await.unwrap(), 1);
    let items = item::Entity::find().all(&db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].category_id, 1);
}

#[tokio::test]
async fn stored_item_is_readable_by_id() {
    let (app, _db) = TestApp::spawn_sqlite().await;

    let created = app
        .add_item(Some("jacket"), Some("fashion"), Some(jpeg_bytes(3)))
        .await;
    let id = created.body["item"]["id"].as_i64().unwrap();

    let res = app.get(&routes::item(id)).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["name"], "jacket");
    assert_eq!(res.body["category"], "fashion");
}

#[tokio::test]
async fn invalid_submission_leaves_database_empty() {
    let (app, db) = TestApp::spawn_sqlite().await;

    let res = app
        .add_item(Some(""), Some("fashion"), Some(jpeg_bytes(4)))
        .await;
    assert_eq!(res.status, 400);

    assert_eq!(category::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(item::Entity::find().count(&db).await.unwrap(), 0);
}
