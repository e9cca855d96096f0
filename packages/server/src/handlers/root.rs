use axum::Json;

use crate::models::MessageResponse;

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "hello",
    summary = "Greeting",
    responses((status = 200, description = "Service is up", body = MessageResponse)),
)]
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello, world!".into(),
    })
}
