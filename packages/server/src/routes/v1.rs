use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/items", item_routes(config))
        .nest("/images", image_routes())
}

fn item_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::item::add_item))
        .layer(handlers::item::add_item_body_limit(
            config.storage.max_image_size,
        ));

    let read = OpenApiRouter::new().routes(routes!(handlers::item::get_item));

    upload.merge(read)
}

fn image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::image::get_image))
}
