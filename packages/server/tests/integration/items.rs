use catalog_server::repository::ItemRepository;
use reqwest::multipart::{Form, Part};

use crate::common::{TestApp, jpeg_bytes, png_bytes, routes};

mod add_item {
    use super::*;

    #[tokio::test]
    async fn valid_submission_creates_category_and_item() {
        let app = TestApp::spawn().await;

        let res = app
            .add_item(Some("jacket"), Some("fashion"), Some(jpeg_bytes(1)))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "item received: jacket");
        assert_eq!(res.body["item"]["name"], "jacket");
        assert_eq!(res.body["item"]["category"], "fashion");

        let categories = app.repo.categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "fashion");

        let items = app.repo.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "jacket");
        assert_eq!(items[0].category_id, categories[0].id);
        assert_eq!(app.stored_images(), vec![items[0].image_name.clone()]);
    }

    #[tokio::test]
    async fn png_is_accepted_and_stored_with_png_extension() {
        let app = TestApp::spawn().await;

        let res = app
            .add_item(Some("icon"), Some("art"), Some(png_bytes()))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let image_name = res.body["item"]["image_name"].as_str().unwrap();
        assert!(image_name.ends_with(".png"));
    }

    #[tokio::test]
    async fn existing_category_is_reused() {
        let app = TestApp::spawn().await;
        let phone = app.repo.insert_category("phone").await.unwrap();
        assert_eq!(phone.id, 1);

        let res = app
            .add_item(Some("MacBook"), Some("phone"), Some(jpeg_bytes(2)))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(app.repo.categories().len(), 1);
        assert_eq!(app.repo.items()[0].category_id, 1);
    }

    #[tokio::test]
    async fn same_category_twice_creates_one_row() {
        let app = TestApp::spawn().await;

        let first = app
            .add_item(Some("jacket"), Some("fashion"), Some(jpeg_bytes(3)))
            .await;
        let second = app
            .add_item(Some("coat"), Some("fashion"), Some(jpeg_bytes(4)))
            .await;

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 200);
        assert_eq!(app.repo.categories().len(), 1);

        let items = app.repo.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category_id, items[1].category_id);
    }

    #[tokio::test]
    async fn identical_images_share_one_file() {
        let app = TestApp::spawn().await;

        let first = app
            .add_item(Some("jacket"), Some("fashion"), Some(jpeg_bytes(5)))
            .await;
        let second = app
            .add_item(Some("jacket v2"), Some("fashion"), Some(jpeg_bytes(5)))
            .await;

        assert_eq!(
            first.body["item"]["image_name"],
            second.body["item"]["image_name"]
        );
        assert_eq!(app.stored_images().len(), 1);
    }

    #[tokio::test]
    async fn unknown_fields_are_ignored() {
        let app = TestApp::spawn().await;
        let form = Form::new()
            .text("name", "jacket")
            .text("category", "fashion")
            .text("price", "1000")
            .part(
                "image",
                Part::bytes(jpeg_bytes(6)).file_name("jacket.jpg"),
            );

        let res = app.post_form(routes::ITEMS, form).await;
        assert_eq!(res.status, 200, "{}", res.text);
    }
}

mod add_item_validation {
    use super::*;

    async fn assert_rejected(app: &TestApp, res: crate::common::TestResponse) {
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(app.repo.categories().is_empty());
        assert!(app.repo.items().is_empty());
        assert!(app.stored_images().is_empty());
    }

    #[tokio::test]
    async fn empty_request() {
        let app = TestApp::spawn().await;
        let res = app.add_item(None, None, None).await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn missing_name() {
        let app = TestApp::spawn().await;
        let res = app
            .add_item(None, Some("fashion"), Some(jpeg_bytes(1)))
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn empty_name() {
        let app = TestApp::spawn().await;
        let res = app
            .add_item(Some(""), Some("fashion"), Some(jpeg_bytes(1)))
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn missing_category() {
        let app = TestApp::spawn().await;
        let res = app
            .add_item(Some("jacket"), None, Some(jpeg_bytes(1)))
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn missing_image() {
        let app = TestApp::spawn().await;
        let res = app.add_item(Some("jacket"), Some("fashion"), None).await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn empty_image() {
        let app = TestApp::spawn().await;
        let res = app
            .add_item(Some("jacket"), Some("fashion"), Some(Vec::new()))
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn text_instead_of_image() {
        let app = TestApp::spawn().await;
        let res = app
            .add_item(
                Some("jacket"),
                Some("fashion"),
                Some(b"this is not an image".to_vec()),
            )
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn arbitrary_bytes_instead_of_image() {
        let app = TestApp::spawn().await;
        let noise: Vec<u8> = (0..=255u8).collect();
        let res = app
            .add_item(Some("jacket"), Some("fashion"), Some(noise))
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn name_too_long() {
        let app = TestApp::spawn().await;
        let long = "a".repeat(256);
        let res = app
            .add_item(Some(&long), Some("fashion"), Some(jpeg_bytes(1)))
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn category_too_long() {
        let app = TestApp::spawn().await;
        let long = "a".repeat(256);
        let res = app
            .add_item(Some("jacket"), Some(&long), Some(jpeg_bytes(1)))
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn image_over_size_limit() {
        let app = TestApp::spawn_with_max_image_size(64).await;
        let res = app
            .add_item(Some("jacket"), Some("fashion"), Some(jpeg_bytes(1)))
            .await;
        assert_rejected(&app, res).await;
    }

    #[tokio::test]
    async fn duplicated_field() {
        let app = TestApp::spawn().await;
        let form = Form::new()
            .text("name", "jacket")
            .text("name", "coat")
            .text("category", "fashion")
            .part("image", Part::bytes(jpeg_bytes(1)).file_name("a.jpg"));

        let res = app.post_form(routes::ITEMS, form).await;
        assert_rejected(&app, res).await;
    }
}

mod add_item_failures {
    use super::*;

    #[tokio::test]
    async fn insert_failure_is_server_error_and_cleans_up_image() {
        let app = TestApp::spawn().await;
        app.repo.fail_item_inserts(true);

        let res = app
            .add_item(Some("jacket"), Some("fashion"), Some(jpeg_bytes(7)))
            .await;

        assert_eq!(res.status, 500, "{}", res.text);
        assert_eq!(res.body["code"], "ITEM_INSERTION_FAILED");
        // The category was created before the insert and stays.
        assert_eq!(app.repo.categories().len(), 1);
        assert!(app.repo.items().is_empty());
        assert!(app.stored_images().is_empty());
    }
}

mod get_item {
    use super::*;

    #[tokio::test]
    async fn returns_stored_item_with_category_name() {
        let app = TestApp::spawn().await;
        let created = app
            .add_item(Some("jacket"), Some("fashion"), Some(jpeg_bytes(8)))
            .await;
        let id = created.body["item"]["id"].as_i64().unwrap();

        let res = app.get(&routes::item(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"].as_i64(), Some(id));
        assert_eq!(res.body["name"], "jacket");
        assert_eq!(res.body["category"], "fashion");
        assert_eq!(res.body["image_name"], created.body["item"]["image_name"]);
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_json_validation_error() {
        let app = TestApp::spawn().await;
        let res = app.get("/api/v1/items/abc").await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].is_string());
    }

    #[tokio::test]
    async fn unknown_id_returns_404() {
        let app = TestApp::spawn().await;
        let res = app.get(&routes::item(999)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn hello_greets() {
    let app = TestApp::spawn().await;
    let res = app.get("/").await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["message"], "Hello, world!");
}
